use std::fs::File;
use std::io::{BufRead, BufReader};

use tempfile::NamedTempFile;
use vcf_sample_info::annotate::{self, Summary};
use vcf_sample_info::{Annotator, Error, Statistic, VcfRecords, VcfWriter};

const EXAMPLE: &str = "resources/example.vcf";

fn run_on(vcf: &str, statistic: Statistic) -> (Result<Summary, Error>, String) {
    let records = VcfRecords::new(vcf.as_bytes()).unwrap();
    let annotator = Annotator::new("DP", "statDP", statistic).unwrap();
    let mut writer = VcfWriter::new(Vec::new());
    let result = annotate::run(records, &mut writer, &annotator);
    let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    (result, output)
}

fn vcf_with_depths(rows: &[&[&str]]) -> String {
    let n = rows.first().map(|r| r.len()).unwrap_or(0);
    let samples: Vec<_> = (1..=n).map(|i| format!("S{}", i)).collect();
    let mut vcf = format!(
        "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t{}\n",
        samples.join("\t")
    );
    for (i, row) in rows.iter().enumerate() {
        let calls: Vec<_> = row.iter().map(|dp| format!("0/1:{}", dp)).collect();
        vcf.push_str(&format!(
            "1\t{}\t.\tA\tC\t.\tPASS\t.\tGT:DP\t{}\n",
            (i + 1) * 100,
            calls.join("\t")
        ));
    }
    vcf
}

fn info_column(line: &str) -> &str {
    line.split('\t').nth(7).unwrap()
}

#[test]
fn test_median_scenarios() {
    let vcf = vcf_with_depths(&[&["10", "20", "30"], &["30", "10", "20"]]);
    let (result, output) = run_on(&vcf, Statistic::Median);
    assert_eq!(result.unwrap().records, 2);
    let records: Vec<_> = output.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(info_column(records[0]), "statDP=20");
    assert_eq!(info_column(records[1]), "statDP=20");

    let vcf = vcf_with_depths(&[&["40", "10", "30", "20"]]);
    let (result, output) = run_on(&vcf, Statistic::Median);
    result.unwrap();
    let last = output.lines().last().unwrap();
    // rank n/2 of the ordered values, not the average of the central pair
    assert_eq!(info_column(last), "statDP=30");
}

#[test]
fn test_mean_scenario() {
    let vcf = vcf_with_depths(&[&["2", "4"]]);
    let (result, output) = run_on(&vcf, Statistic::Mean);
    result.unwrap();
    assert_eq!(info_column(output.lines().last().unwrap()), "statDP=3");
}

#[test]
fn test_declaration_emitted_once_before_records() {
    let vcf = vcf_with_depths(&[&["1", "2"], &["3", "4"], &["5", "6"], &["7", "8"]]);
    let (result, output) = run_on(&vcf, Statistic::Max);
    assert_eq!(result.unwrap().records, 4);
    let lines: Vec<_> = output.lines().collect();
    let declarations: Vec<_> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.starts_with("##INFO=<ID=statDP,"))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(declarations.len(), 1);
    let column_line = lines.iter().position(|l| l.starts_with("#CHROM")).unwrap();
    assert_eq!(declarations[0] + 1, column_line);
    assert_eq!(
        lines[declarations[0]],
        "##INFO=<ID=statDP,Number=1,Type=Float,Description=\"Summary statistic generated by max of per-sample values of DP\">"
    );
}

#[test]
fn test_multi_value_aborts_before_record_is_written() {
    let vcf = vcf_with_depths(&[&["1", "2"], &["5,6", "2"], &["3", "4"]]);
    let (result, output) = run_on(&vcf, Statistic::Mean);
    assert!(matches!(result, Err(Error::MultiValueField { pos: 200, .. })));
    let records: Vec<_> = output.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(records.len(), 1);
    assert!(records[0].starts_with("1\t100\t"));
}

#[test]
fn test_missing_field_aborts_instead_of_emitting_zero() {
    let vcf = "##fileformat=VCFv4.2\n\
        #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\n\
        1\t100\t.\tA\tC\t.\tPASS\t.\tGT\t0/1\t1/1\n";
    for statistic in &[Statistic::Mean, Statistic::Median, Statistic::Min, Statistic::Max] {
        let (result, output) = run_on(vcf, *statistic);
        assert!(matches!(result, Err(Error::EmptyStatistic { pos: 100, .. })));
        assert!(output.lines().all(|l| l.starts_with('#')));
    }
}

#[test]
fn test_non_numeric_aborts() {
    let vcf = vcf_with_depths(&[&["1", "high"]]);
    let (result, _) = run_on(&vcf, Statistic::Min);
    assert!(matches!(result, Err(Error::NumericParse { .. })));
}

#[test]
fn test_untouched_fields_pass_through() {
    let input = std::fs::read_to_string(EXAMPLE).unwrap();
    let records = VcfRecords::from_path(EXAMPLE).unwrap();
    let annotator = Annotator::new("DP", "meanDP", Statistic::Mean).unwrap();
    let mut writer = VcfWriter::new(Vec::new());
    let summary = annotate::run(records, &mut writer, &annotator).unwrap();
    assert_eq!(summary.records, 3);
    let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();

    let input_records: Vec<_> = input.lines().filter(|l| !l.starts_with('#')).collect();
    let output_records: Vec<_> = output.lines().filter(|l| !l.starts_with('#')).collect();
    let expected_info = ["AC=4;DB;meanDP=20", "AC=1;meanDP=30", "meanDP=4.5"];
    for ((before, after), info) in input_records.iter().zip(&output_records).zip(&expected_info) {
        let before: Vec<_> = before.split('\t').collect();
        let after: Vec<_> = after.split('\t').collect();
        assert_eq!(before.len(), after.len());
        for (column, (b, a)) in before.iter().zip(&after).enumerate() {
            if column == 7 {
                assert_eq!(a, info);
            } else {
                assert_eq!(b, a);
            }
        }
    }

    // header: every input line kept, in order, plus the declaration
    let input_header: Vec<_> = input.lines().filter(|l| l.starts_with("##")).collect();
    let output_header: Vec<_> = output.lines().filter(|l| l.starts_with("##")).collect();
    assert_eq!(&output_header[..input_header.len()], &input_header[..]);
    assert_eq!(output_header.len(), input_header.len() + 1);
}

#[test]
fn test_existing_info_is_overwritten() {
    let input = std::fs::read_to_string(EXAMPLE).unwrap();
    let records = VcfRecords::new(input.as_bytes()).unwrap();
    let annotator = Annotator::new("GQ", "AC", Statistic::Min).unwrap();
    let mut writer = VcfWriter::new(Vec::new());
    let result = annotate::run(records, &mut writer, &annotator);
    // third record has no GQ at all
    assert!(matches!(result, Err(Error::EmptyStatistic { pos: 818046, .. })));
    let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    let records: Vec<_> = output.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(info_column(records[0]), "AC=60;DB");
    assert_eq!(info_column(records[1]), "AC=12");
}

#[test]
fn test_compressed_input_to_file() {
    let out = NamedTempFile::new().unwrap();
    {
        let records = VcfRecords::from_path("resources/example.vcf.gz").unwrap();
        let annotator = Annotator::new("DP", "maxDP", Statistic::Max).unwrap();
        let mut writer = VcfWriter::new(File::create(out.path()).unwrap());
        annotate::run(records, &mut writer, &annotator).unwrap();
    }
    let lines: Vec<_> = BufReader::new(File::open(out.path()).unwrap())
        .lines()
        .collect::<Result<_, _>>()
        .unwrap();
    let records: Vec<&String> = lines.iter().filter(|l| !l.starts_with('#')).collect();
    let values: Vec<_> = records.iter().map(|l| info_column(l)).collect();
    assert_eq!(values, vec!["AC=4;DB;maxDP=30", "AC=1;maxDP=40", "maxDP=7"]);
}

#[test]
fn test_empty_info_segments_do_not_abort() {
    let vcf = "##fileformat=VCFv4.2\n\
        #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\n\
        1\t100\t.\tA\tC\t.\tPASS\tAC=1;\tGT:DP\t0/1:2\t1/1:4\n\
        1\t200\t.\tA\tC\t.\tPASS\tAC=1;;DB\tGT:DP\t0/1:6\t1/1:8\n";
    let (result, output) = run_on(vcf, Statistic::Mean);
    assert_eq!(result.unwrap().records, 2);
    let records: Vec<_> = output.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(info_column(records[0]), "AC=1;statDP=3");
    assert_eq!(info_column(records[1]), "AC=1;DB;statDP=7");
}
