use std::collections::BTreeMap;

use dqc_model::{
    AcquisitionMapping, ComplianceReport, ComplianceVerdict, GroupRow, ValidationOutcome,
    ValidationRun, Value,
};
use dqc_report::{ReportEntry, SessionReport, flat_entries};

fn mapping() -> AcquisitionMapping {
    let mut entries = BTreeMap::new();
    entries.insert("t1_mpr".to_string(), Some("T1".to_string()));
    entries.insert("func_rest".to_string(), None);
    AcquisitionMapping::freeze(entries)
}

fn t1_report() -> ComplianceReport {
    ComplianceReport {
        scan: "T1".to_string(),
        verdicts: vec![ComplianceVerdict {
            field: "EchoTime".to_string(),
            actual: Some(Value::Float(3.2)),
            expected: "3 ± 0.1".to_string(),
            passed: false,
        }],
    }
}

#[test]
fn flat_report_shape_is_stable() {
    let reports = vec![("t1_mpr".to_string(), None, t1_report())];
    let report = SessionReport::new(flat_entries(&mapping(), &reports));

    insta::assert_json_snapshot!(report, @r#"
    {
      "schema": "dicom-qc.compliance-report",
      "schema_version": 1,
      "entries": [
        {
          "Acquisition": "t1_mpr",
          "Parameter": "EchoTime",
          "Value": "3.2",
          "Expected": "3 ± 0.1",
          "Pass": false
        },
        {
          "Acquisition": "func_rest",
          "Parameter": "Acquisition",
          "Value": "unmatched",
          "Expected": "reference acquisition",
          "Pass": false
        }
      ]
    }
    "#);
}

#[test]
fn grouped_rule_outcomes_serialize_inside_the_report() {
    let run = ValidationRun {
        passed: false,
        failures: vec![ValidationOutcome {
            acquisition: "t1_mpr".to_string(),
            fields: vec!["EchoTime".to_string()],
            rule: "Echo time must be consistent".to_string(),
            observed: vec![
                GroupRow {
                    values: vec![Value::Float(2.96)],
                    count: 2,
                },
                GroupRow {
                    values: vec![Value::Float(3.1)],
                    count: 1,
                },
            ],
            message: Some("expected one echo time, found 2".to_string()),
            passed: false,
        }],
        successes: vec![ValidationOutcome {
            acquisition: "<session>".to_string(),
            fields: Vec::new(),
            rule: "Session rows must name their acquisition".to_string(),
            observed: Vec::new(),
            message: None,
            passed: true,
        }],
    };
    let report = SessionReport::new(Vec::new()).with_rules(run);
    assert!(!report.is_compliant());

    insta::assert_json_snapshot!(report, @r#"
    {
      "schema": "dicom-qc.compliance-report",
      "schema_version": 1,
      "entries": [],
      "rules": {
        "passed": false,
        "failures": [
          {
            "acquisition": "t1_mpr",
            "fields": [
              "EchoTime"
            ],
            "rule": "Echo time must be consistent",
            "observed": [
              {
                "values": [
                  2.96
                ],
                "count": 2
              },
              {
                "values": [
                  3.1
                ],
                "count": 1
              }
            ],
            "message": "expected one echo time, found 2",
            "passed": false
          }
        ],
        "successes": [
          {
            "acquisition": "<session>",
            "fields": [],
            "rule": "Session rows must name their acquisition",
            "observed": [],
            "message": null,
            "passed": true
          }
        ]
      }
    }
    "#);
}

#[test]
fn nested_report_shape_is_stable() {
    let entries = vec![ReportEntry {
        acquisition: "t1_mpr".to_string(),
        group: Some("baseline".to_string()),
        parameter: "EchoTime".to_string(),
        value: "3.2".to_string(),
        expected: "3 ± 0.1".to_string(),
        pass: false,
    }];
    let nested = SessionReport::new(entries).nested();

    insta::assert_json_snapshot!(nested, @r#"
    {
      "schema": "dicom-qc.compliance-report",
      "schema_version": 1,
      "acquisitions": [
        {
          "Acquisition": "t1_mpr",
          "Groups": [
            {
              "Name": "baseline",
              "Parameters": [
                {
                  "Parameter": "EchoTime",
                  "Value": "3.2",
                  "Expected": "3 ± 0.1",
                  "Pass": false
                }
              ]
            }
          ]
        }
      ]
    }
    "#);
}
