use super::*;
use crate::table::{Delimiter, Table};

fn measurements() -> Table {
    Table::new("Time in h", vec![0.into(), 1.into()])
        .unwrap()
        .with_column("2C13", vec![Some(10.0), Some(20.0)])
        .unwrap()
        .with_column("No label", vec![Some(100.0), Some(80.0)])
        .unwrap()
        .with_column("4C13", vec![Some(5.0), Some(8.0)])
        .unwrap()
}

fn k1() -> SiteTable {
    SiteTable::new("K1", "Time in h", vec![0.into(), 1.into()])
        .unwrap()
        .with_percentage("siteA", vec![Some(60.0), Some(50.0)])
        .unwrap()
        .with_percentage("siteB", vec![Some(40.0), Some(50.0)])
        .unwrap()
}

fn k2() -> SiteTable {
    SiteTable::new("K2", "Time in h", vec![1.into(), 0.into()])
        .unwrap()
        .with_metadata("Exp", vec![Some("A".to_string()), Some("A".to_string())])
        .unwrap()
        .with_percentage("K6", vec![Some(25.0), Some(100.0)])
        .unwrap()
        .with_percentage("K10", vec![Some(75.0), Some(0.0)])
        .unwrap()
}

fn sites() -> SiteTables {
    vec![k1(), k2()].into_iter().collect()
}

fn names(table: &Table) -> Vec<&str> {
    table.column_names().collect()
}

#[test]
fn test_example_scenario() {
    let measurements = Table::new("Time in h", vec![0.into(), 1.into()])
        .unwrap()
        .with_column("2C13", vec![Some(10.0), Some(20.0)])
        .unwrap();
    let mapping = SiteMapping::new().with("K1", "2C13");

    let result = redistribute(&measurements, &sites(), &mapping).unwrap();

    assert_eq!(result.key_name(), "Time in h");
    assert_eq!(names(&result), vec!["2C13 siteA", "2C13 siteB"]);
    assert_eq!(result.column("2C13 siteA"), Some(&[Some(6.0), Some(10.0)][..]));
    assert_eq!(result.column("2C13 siteB"), Some(&[Some(4.0), Some(10.0)][..]));
}

#[test]
fn test_multiple_sites_and_ordering() {
    let mapping = SiteMapping::new().with("K2", "4C13").with("K1", "2C13");
    let result = redistribute(&measurements(), &sites(), &mapping).unwrap();

    assert_eq!(
        names(&result),
        vec!["No label", "2C13 siteA", "2C13 siteB", "4C13 K10", "4C13 K6"]
    );
    // K2 rows are listed in reverse key order and must be matched by key
    assert_eq!(result.column("4C13 K6"), Some(&[Some(5.0), Some(2.0)][..]));
    assert_eq!(result.column("4C13 K10"), Some(&[Some(0.0), Some(6.0)][..]));
}

#[test]
fn test_mass_is_conserved() {
    let mapping = SiteMapping::new().with("K1", "2C13").with("K2", "4C13");
    let input = measurements();
    let result = redistribute(&input, &sites(), &mapping).unwrap();

    for (column, derived) in [("2C13", ["2C13 siteA", "2C13 siteB"]), ("4C13", ["4C13 K6", "4C13 K10"])] {
        let original = input.column(column).unwrap();
        for row in 0..input.n_rows() {
            let sum: f64 = derived
                .iter()
                .map(|d| result.column(d).unwrap()[row].unwrap())
                .sum();
            assert!((sum - original[row].unwrap()).abs() < 1e-9);
        }
    }
}

#[test]
fn test_input_tables_are_not_modified() {
    let input = measurements();
    let sites = sites();
    let mapping = SiteMapping::new().with("K1", "2C13");
    let _ = redistribute(&input, &sites, &mapping).unwrap();

    assert_eq!(input, measurements());
    assert_eq!(sites, self::sites());
}

#[test]
fn test_empty_mapping_only_sorts() {
    let result = redistribute(&measurements(), &sites(), &SiteMapping::new()).unwrap();
    assert_eq!(names(&result), vec!["No label", "2C13", "4C13"]);
    assert_eq!(result.column("2C13"), measurements().column("2C13"));
    assert_eq!(result.keys(), measurements().keys());
}

#[test]
fn test_key_mismatch_is_data_validation_error() {
    let shifted = SiteTable::new("K1", "Time in h", vec![0.into(), 2.into()])
        .unwrap()
        .with_percentage("siteA", vec![Some(60.0), Some(50.0)])
        .unwrap()
        .with_percentage("siteB", vec![Some(40.0), Some(50.0)])
        .unwrap();
    let sites: SiteTables = vec![shifted].into_iter().collect();
    let mapping = SiteMapping::new().with("K1", "2C13");

    let err = redistribute(&measurements(), &sites, &mapping).unwrap_err();
    match err {
        SiteFractionError::DataValidation(DataValidationError::KeyMismatch {
            site,
            missing_in_site,
            missing_in_measurements,
        }) => {
            assert_eq!(site, "K1");
            assert_eq!(missing_in_site, vec!["1".to_string()]);
            assert_eq!(missing_in_measurements, vec!["2".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_values_are_rejected() {
    let gap = SiteTable::new("K1", "Time in h", vec![0.into(), 1.into()])
        .unwrap()
        .with_percentage("siteA", vec![Some(60.0), None])
        .unwrap()
        .with_percentage("siteB", vec![Some(40.0), Some(50.0)])
        .unwrap();
    let sites: SiteTables = vec![gap].into_iter().collect();
    let mapping = SiteMapping::new().with("K1", "2C13");
    let err = redistribute(&measurements(), &sites, &mapping).unwrap_err();
    assert!(matches!(
        err,
        SiteFractionError::DataValidation(DataValidationError::MissingValue { ref column, ref key, .. })
            if column == "% siteA" && key == "1"
    ));

    let measurements = measurements();
    let mut holes = Table::new("Time in h", measurements.keys().to_vec()).unwrap();
    holes.push_column("2C13", vec![Some(1.0), Some(2.0)]).unwrap();
    holes.push_column("Rep", vec![None, Some(1.0)]).unwrap();
    let err = redistribute(&holes, &self::sites(), &SiteMapping::new().with("K1", "2C13"))
        .unwrap_err();
    assert!(matches!(
        err,
        SiteFractionError::DataValidation(DataValidationError::MissingValue { ref column, .. })
            if column == "Rep"
    ));
}

#[test]
fn test_percentage_sum_check() {
    let skewed = SiteTable::new("K1", "Time in h", vec![0.into(), 1.into()])
        .unwrap()
        .with_percentage("siteA", vec![Some(60.0), Some(50.0)])
        .unwrap()
        .with_percentage("siteB", vec![Some(30.0), Some(50.0)])
        .unwrap();
    let sites: SiteTables = vec![skewed].into_iter().collect();
    let mapping = SiteMapping::new().with("K1", "2C13");

    let err = redistribute(&measurements(), &sites, &mapping).unwrap_err();
    assert!(matches!(
        err,
        SiteFractionError::DataValidation(DataValidationError::PercentageSum { ref key, .. })
            if key == "0"
    ));

    let lenient = SiteFractionRedistributor::new(SiteFractionConfig::without_sum_check());
    let result = lenient.redistribute(&measurements(), &sites, &mapping).unwrap();
    assert_eq!(result.column("2C13 siteB"), Some(&[Some(3.0), Some(10.0)][..]));
}

#[test]
fn test_percentage_out_of_range() {
    let bad = SiteTable::new("K1", "Time in h", vec![0.into(), 1.into()])
        .unwrap()
        .with_percentage("siteA", vec![Some(120.0), Some(50.0)])
        .unwrap()
        .with_percentage("siteB", vec![Some(-20.0), Some(50.0)])
        .unwrap();
    let sites: SiteTables = vec![bad].into_iter().collect();
    let lenient = SiteFractionRedistributor::new(SiteFractionConfig::without_sum_check());
    let err = lenient
        .redistribute(&measurements(), &sites, &SiteMapping::new().with("K1", "2C13"))
        .unwrap_err();
    assert!(matches!(
        err,
        SiteFractionError::DataValidation(DataValidationError::PercentageOutOfRange { value, .. })
            if value == 120.0
    ));
}

#[test]
fn test_mapping_errors_raised_up_front() {
    let cases = [
        (SiteMapping::new().with("K9", "2C13"), "unknown site"),
        (SiteMapping::new().with("K1", "6C13"), "unknown column"),
        (
            SiteMapping::new().with("K1", "2C13").with("K2", "2C13"),
            "column mapped twice",
        ),
    ];
    for (mapping, case) in cases {
        let err = redistribute(&measurements(), &sites(), &mapping).unwrap_err();
        assert!(err.is_mapping_error(), "{case}: {err}");
    }

    let other_key = SiteTable::new("K1", "Sample", vec![0.into(), 1.into()])
        .unwrap()
        .with_percentage("siteA", vec![Some(100.0), Some(100.0)])
        .unwrap();
    let sites: SiteTables = vec![other_key].into_iter().collect();
    let err = redistribute(&measurements(), &sites, &SiteMapping::new().with("K1", "2C13"))
        .unwrap_err();
    assert!(matches!(err, SiteFractionError::MissingKeyColumn { .. }));

    let no_pct = SiteTable::new("K1", "Time in h", vec![0.into(), 1.into()])
        .unwrap()
        .with_metadata("Exp", vec![Some("A".into()), Some("B".into())])
        .unwrap();
    let sites: SiteTables = vec![no_pct].into_iter().collect();
    let err = redistribute(&measurements(), &sites, &SiteMapping::new().with("K1", "2C13"))
        .unwrap_err();
    assert!(matches!(err, SiteFractionError::NoPercentageColumns(_)));
}

#[test]
fn test_derived_column_collision() {
    let input = measurements()
        .with_column("2C13 siteA", vec![Some(1.0), Some(1.0)])
        .unwrap();
    let err = redistribute(&input, &sites(), &SiteMapping::new().with("K1", "2C13")).unwrap_err();
    assert!(matches!(err, SiteFractionError::DerivedColumnExists(ref c) if c == "2C13 siteA"));
}

#[test]
fn test_site_table_from_reader() {
    let csv = "Time in h,Exp,% K6,% K10\n0,A,30,70\n1.0,A,45.5,54.5\n";
    let table =
        SiteTable::from_reader("K2", csv.as_bytes(), Delimiter::Comma, "Time in h", "% ").unwrap();

    assert_eq!(table.name(), "K2");
    assert_eq!(table.n_rows(), 2);
    let pct: Vec<_> = table.percentage_columns().map(|(_, s, _)| s).collect();
    assert_eq!(pct, vec!["K6", "K10"]);
    assert!(matches!(&table.columns()[0], SiteColumn::Metadata { name, .. } if name == "Exp"));

    let err = SiteTable::from_reader("K2", csv.as_bytes(), Delimiter::Comma, "Sample", "% ")
        .unwrap_err();
    assert!(matches!(err, SiteFractionError::MissingKeyColumn { .. }));
}

#[test]
fn test_parse_assignment() {
    assert_eq!(
        parse_assignment("K1=4C13 3H02").unwrap(),
        ("K1".to_string(), "4C13 3H02".to_string())
    );
    assert!(parse_assignment("K1").is_err());
    assert!(parse_assignment("=2C13").is_err());
}

#[test]
fn test_mapping_keeps_insertion_order() {
    let mut mapping: SiteMapping = vec![("K2", "4C13"), ("K1", "2C13")].into_iter().collect();
    mapping.insert("K2", "4C13 3H02");
    assert_eq!(
        mapping.iter().collect::<Vec<_>>(),
        vec![("K2", "4C13 3H02"), ("K1", "2C13")]
    );
    assert_eq!(mapping.column_for("K1"), Some("2C13"));
}

#[test]
fn test_sum_deviation_equal_to_tolerance_passes() {
    let thirds = (0..3).fold(
        SiteTable::new("K1", "Time in h", vec![0.into(), 1.into()]).unwrap(),
        |table, i| {
            table
                .with_percentage(format!("K{}", i), vec![Some(33.33), Some(33.33)])
                .unwrap()
        },
    );
    let sites: SiteTables = vec![thirds].into_iter().collect();
    let mapping = SiteMapping::new().with("K1", "2C13");
    let result = redistribute(&measurements(), &sites, &mapping).unwrap();
    assert!(result.contains_column("2C13 K2"));

    let strict = SiteFractionRedistributor::new(
        SiteFractionConfig::default().with_sum_tolerance(Some(0.005)),
    );
    let err = strict.redistribute(&measurements(), &sites, &mapping).unwrap_err();
    assert!(matches!(
        err,
        SiteFractionError::DataValidation(DataValidationError::PercentageSum { .. })
    ));
}

#[test]
fn test_na_metadata_cell_is_missing() {
    let csv = "Time in h,Exp,% siteA,% siteB\n0,NA,60,40\n1,A,50,50\n";
    let table =
        SiteTable::from_reader("K1", csv.as_bytes(), Delimiter::Comma, "Time in h", "% ").unwrap();
    assert!(table.columns()[0].is_missing(0));
    assert!(!table.columns()[0].is_missing(1));

    let sites: SiteTables = vec![table].into_iter().collect();
    let err = redistribute(&measurements(), &sites, &SiteMapping::new().with("K1", "2C13"))
        .unwrap_err();
    assert!(matches!(
        err,
        SiteFractionError::DataValidation(DataValidationError::MissingValue { ref column, ref key, .. })
            if column == "Exp" && key == "0"
    ));
}

#[test]
fn test_from_dir_for_sites_reads_only_named_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("K1.csv"),
        "Time in h,% siteA,% siteB\n0,60,40\n1,50,50\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("Summary.csv"), "Peptide,Comment\nKQLATKAAR,fine\n").unwrap();

    let tables = SiteTables::from_dir_for_sites(dir.path(), "Time in h", "% ", ["K1"]).unwrap();
    assert_eq!(tables.names().collect::<Vec<_>>(), vec!["K1"]);

    let err = SiteTables::from_dir(dir.path(), "Time in h", "% ").unwrap_err();
    assert!(matches!(err, SiteFractionError::MissingKeyColumn { ref site, .. } if site == "Summary"));
}
