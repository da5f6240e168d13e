use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use gxfgenie::io::{gxf_parser, open_lines, GxfWriter};
use gxfgenie::{Gtf, LineSource};
use indoc::indoc;
use std::io::Write;
use std::path::{Path, PathBuf};

const GTF: &str = indoc! {"
    ##provider: GENCODE
    chr1\tHAVANA\tgene\t11869\t14409\t.\t+\t.\tgene_id \"ENSG00000223972.5\"; gene_name \"DDX11L1\";
    chr1\tHAVANA\ttranscript\t11869\t14409\t.\t+\t.\tgene_id \"ENSG00000223972.5\"; transcript_id \"ENST00000456328.2\";
"};

/// Writes gz-compressed contents to a file and returns its path.
fn write_gzip_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(contents.as_bytes()).unwrap();
    let gz = encoder.finish().unwrap();

    let path = dir.join(name);
    std::fs::write(&path, gz).unwrap();
    path
}

/// Writes bz2-compressed contents to a file and returns its path.
fn write_bzip2_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let mut encoder = BzEncoder::new(Vec::new(), bzip2::Compression::default());
    encoder.write_all(contents.as_bytes()).unwrap();
    let bz = encoder.finish().unwrap();

    let path = dir.join(name);
    std::fs::write(&path, bz).unwrap();
    path
}

/// Reads every line of a source.
fn read_all(mut lines: impl LineSource) -> Vec<String> {
    let mut out = Vec::new();
    while let Some(line) = lines.next_line().unwrap() {
        out.push(line);
    }
    out
}

/// Parses a gzipped GTF.
#[test]
fn parse_gzipped_gtf() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gzip_file(dir.path(), "annot.gtf.gz", GTF);

    let items = gxf_parser(&path, Gtf)
        .unwrap()
        .collect::<gxfgenie::Result<Vec<_>>>()
        .unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(
        items[2].as_record().unwrap().attrs().get_value1("transcript_id"),
        Ok("ENST00000456328.2")
    );
}

/// Parses a bzip2 GTF.
#[test]
fn parse_bzip2_gtf() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bzip2_file(dir.path(), "annot.gtf.bz2", GTF);

    let lines = read_all(open_lines(&path).unwrap());
    assert_eq!(lines, GTF.lines().collect::<Vec<_>>());
}

/// Concatenated gzip members are read as one stream.
#[test]
fn read_multi_member_gzip() {
    let dir = tempfile::tempdir().unwrap();
    let (head, tail) = GTF.split_at(GTF.find("chr1").unwrap());

    let mut bytes = Vec::new();
    for part in [head, tail] {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(part.as_bytes()).unwrap();
        bytes.extend(encoder.finish().unwrap());
    }
    let path = dir.path().join("bgzip.gtf.gz");
    std::fs::write(&path, bytes).unwrap();

    assert_eq!(read_all(open_lines(&path).unwrap()).len(), 3);
}

/// Output compression follows the suffix and reads back unchanged.
#[test]
fn write_compressed_output() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["out.gtf", "out.gtf.gz", "out.gtf.bz2"] {
        let path = dir.path().join(name);
        let mut writer = GxfWriter::create(&path).unwrap();
        writer.write_all(GTF.as_bytes()).unwrap();
        writer.finish().unwrap();

        let lines = read_all(open_lines(&path).unwrap());
        assert_eq!(lines, GTF.lines().collect::<Vec<_>>(), "{name}");
    }
}
