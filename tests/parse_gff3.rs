use gxfgenie::io::gxf_parser;
use gxfgenie::{Gff3, GxfGenieError, GxfRecord};
use indoc::indoc;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Writes `contents` to `name` inside `dir`.
fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Parses `path` and returns its records, failing on any error.
fn records(path: &Path) -> Vec<GxfRecord> {
    gxf_parser(path, Gff3)
        .unwrap()
        .filter_map(|item| item.unwrap().into_record())
        .collect()
}

/// Parses a small gene model and checks multi-valued and escaped attributes.
#[test]
fn parse_gene_model() {
    let dir = tempfile::tempdir().unwrap();
    let gff3 = indoc! {"
        ##gff-version 3
        ##sequence-region chr1 1 248956422
        chr1\tHAVANA\tgene\t11869\t14409\t.\t+\t.\tID=ENSG00000223972.5;gene_name=DDX11L1;Note=pseudogene%3B transcribed
        chr1\tHAVANA\ttranscript\t11869\t14409\t.\t+\t.\tID=ENST00000456328.2;Parent=ENSG00000223972.5;tag=basic,CCDS
        chr1\tHAVANA\texon\t11869\t12227\t.\t+\t.\tID=exon:ENST00000456328.2:1;Parent=ENST00000456328.2; exon_number=1
    "};
    let path = write_file(dir.path(), "model.gff3", gff3);

    let records = records(&path);
    assert_eq!(records.len(), 3);

    let gene = &records[0];
    assert_eq!(gene.line_number(), Some(3));
    assert_eq!(
        gene.attrs().get_value1("Note").unwrap(),
        "pseudogene; transcribed"
    );

    let tags = records[1].attrs().get("tag").unwrap();
    assert!(tags.is_multi());
    assert_eq!(tags.get(1), Some("CCDS"));
    assert!(records[1].attrs().get_value1("tag").is_err());

    assert_eq!(records[2].attrs().get_value1("exon_number").unwrap(), "1");
}

/// Escaped values survive a parse and format cycle.
#[test]
fn reformat_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let gff3 = indoc! {"
        ##gff-version 3
        chr1\tBestRefSeq%2CGnomon\tgene\t1\t100\t.\t+\t.\tID=gene-A;Name=a%3Bb;Dbxref=GeneID:1,HGNC:HGNC:5
        chr1\tGnomon\tCDS\t10\t90\t12\t-\t2\tID=cds-A;Parent=rna-A;Note=50%25 identity
        chrUn_KI270742v1\tRefSeq\tcDNA_match\t1\t50\t0.98\t.\t.\tID=aln0;Target=NM_1 1 50 +
    "};
    let path = write_file(dir.path(), "roundtrip.gff3", gff3);

    let text = gxf_parser(&path, Gff3)
        .unwrap()
        .map(|item| item.unwrap().to_string() + "\n")
        .collect::<String>();
    // commas are legal in columns 2-8 and come back unescaped
    assert_eq!(text, gff3.replace("BestRefSeq%2CGnomon", "BestRefSeq,Gnomon"));

    let path = write_file(dir.path(), "again.gff3", &text);
    let again = gxf_parser(&path, Gff3)
        .unwrap()
        .map(|item| item.unwrap().to_string() + "\n")
        .collect::<String>();
    assert_eq!(again, text);
}

/// Escaped text columns are decoded on input and re-escaped on output.
#[test]
fn escaped_text_columns() {
    let dir = tempfile::tempdir().unwrap();
    let gff3 = "chr1%23alt\tsrc%25x\tgene\t1\t10\t.\t+\t.\tID=g\n";
    let path = write_file(dir.path(), "odd.gff3", gff3);

    let record = &records(&path)[0];
    assert_eq!(record.seqname(), "chr1#alt");
    assert_eq!(record.source(), "src%x");
    assert_eq!(record.to_string(), gff3.trim_end());
}

/// Quote-mangled attribute leaves an empty value.
#[test]
fn error_bogus_quotes() {
    let dir = tempfile::tempdir().unwrap();
    let gff3 = indoc! {"
        ##gff-version 3
        chr1\tsrc\tgene\t1\t100\t.\t+\t.\tID=g1;Name=;Alias=\"x\"
    "};
    let path = write_file(dir.path(), "bogusQuotes.gff3", gff3);

    let err = gxf_parser(&path, Gff3)
        .unwrap()
        .find_map(|item| item.err())
        .unwrap();
    assert!(matches!(err, GxfGenieError::Parse(ref e) if e.line_number == 2));
    assert!(err
        .to_string()
        .contains("bogusQuotes.gff3:2: error parsing GxF record:"));
    assert_eq!(
        err.source().unwrap().to_string(),
        "Can't parse attribute=value: `Name='"
    );
}

/// Token without `=` a few lines in.
#[test]
fn error_missing_equals() {
    let dir = tempfile::tempdir().unwrap();
    let gff3 = indoc! {"
        ##gff-version 3
        chr1\tsrc\tgene\t1\t100\t.\t+\t.\tID=g1
        chr1\tsrc\tmRNA\t1\t100\t.\t+\t.\tID=t1;Parent=g1
        # protein
        chr1\tsrc\tCDS\t1\t99\t.\t+\t0\tID=c1;Parent=t1;Acc:KIBRLG]
    "};
    let path = write_file(dir.path(), "errCases1.gff3", gff3);

    let mut parser = gxf_parser(&path, Gff3).unwrap();
    let mut parsed = 0;
    let err = loop {
        match parser.next() {
            Some(Ok(_)) => parsed += 1,
            Some(Err(e)) => break e,
            None => panic!("errCases1.gff3 parsed without error"),
        }
    };
    assert_eq!(parsed, 3);
    assert!(parser.next().is_none());

    let GxfGenieError::Parse(err) = err else {
        panic!("expected a parse error, got {err}");
    };
    assert_eq!(err.line_number, 5);
    assert_eq!(
        err.format_error().message(),
        "Can't parse attribute=value: `Acc:KIBRLG]'"
    );
}
