use chrono::{TimeZone, Utc};
use polars::prelude::*;

use crate::errors::DataError;
use crate::filename::ScienceFilename;
use crate::io::{load_data_file, read_calibration_file, write_data_file};
use crate::l0::{self, L0Packet};
use crate::model::DataLevel;

fn sample_packets() -> Vec<L0Packet> {
    vec![
        L0Packet {
            seq: 0,
            offset_ms: 0,
            counts: vec![100, 7, 0],
        },
        L0Packet {
            seq: 1,
            offset_ms: 1000,
            counts: vec![98, 9, 1],
        },
        L0Packet {
            seq: 2,
            offset_ms: 2000,
            counts: vec![102, 5, 0],
        },
    ]
}

fn sample_epoch() -> chrono::DateTime<Utc> {
    // 2022 day-of-year 239 is August 27.
    Utc.with_ymd_and_hms(2022, 8, 27, 0, 0, 0).single().expect("epoch")
}

#[test]
fn science_filename_round_trips() {
    let name = "hermes_merit_l0_2022239-000000_v01.bin";
    let parsed = ScienceFilename::parse(name).expect("parse filename");

    assert_eq!(parsed.meta.mission, "hermes");
    assert_eq!(parsed.meta.instrument, "merit");
    assert_eq!(parsed.meta.level, DataLevel::L0);
    assert_eq!(parsed.meta.start_time, sample_epoch());
    assert_eq!(parsed.meta.version, 1);
    assert_eq!(parsed.extension, "bin");
    assert_eq!(parsed.to_string(), name);
    assert_eq!(
        parsed.meta.logical_file_id(),
        "hermes_merit_l0_2022239-000000_v01"
    );
}

#[test]
fn science_filename_rejects_malformed_names() {
    let bad = [
        "hermes_merit_l0_2022239-000000_v01",      // no extension
        "hermes_merit_l0_2022239-000000.bin",      // missing version field
        "hermes_merit_l9_2022239-000000_v01.bin",  // unknown level
        "hermes_merit_l0_2022399-000000_v01.bin",  // day-of-year out of range
        "hermes_merit_l0_2022239-000000_01.bin",   // version missing the 'v'
        "hermes_merit_l0_2022239-000000_vxx.bin",  // non-numeric version
        "_merit_l0_2022239-000000_v01.bin",        // empty mission
    ];

    for name in bad {
        let result = ScienceFilename::parse(name);
        assert!(
            matches!(result, Err(DataError::Filename { .. })),
            "expected filename error for '{name}', got {result:?}"
        );
    }
}

#[test]
fn data_level_parses_and_advances() {
    assert_eq!(DataLevel::try_from("L1").expect("parse level"), DataLevel::L1);
    assert!(DataLevel::try_from("l5").is_err());
    assert_eq!(DataLevel::L0.next(), Some(DataLevel::L1));
    assert_eq!(DataLevel::L4.next(), None);
}

#[test]
fn l0_encode_decode_round_trips() {
    let packets = sample_packets();
    let bytes = l0::encode(sample_epoch(), 3, &packets).expect("encode");
    let decoded = l0::decode(&bytes).expect("decode");

    assert_eq!(decoded.epoch, sample_epoch());
    assert_eq!(decoded.packets, packets);
}

#[test]
fn l0_dataframe_has_expected_columns() {
    let bytes = l0::encode(sample_epoch(), 3, &sample_packets()).expect("encode");
    let decoded = l0::decode(&bytes).expect("decode");
    let df = l0::to_dataframe(&decoded).expect("dataframe");

    assert_eq!(df.height(), 3);
    assert_eq!(
        df.get_column_names(),
        ["timestamp", "seq", "counts_ch00", "counts_ch01", "counts_ch02"]
    );

    let ts = df
        .column("timestamp")
        .expect("timestamp column")
        .datetime()
        .expect("datetime");
    let expected_micros = sample_epoch().timestamp() * 1_000_000 + 1_000_000;
    assert_eq!(ts.get(1), Some(expected_micros));

    let ch0 = df
        .column("counts_ch00")
        .expect("counts column")
        .i64()
        .expect("i64");
    assert_eq!(ch0.get(2), Some(102));
}

#[test]
fn l0_decode_rejects_corruption() {
    let good = l0::encode(sample_epoch(), 3, &sample_packets()).expect("encode");

    let mut bad_magic = good.clone();
    bad_magic[0] = b'X';
    assert!(matches!(
        l0::decode(&bad_magic),
        Err(DataError::FormatMismatch { .. })
    ));

    let mut bad_version = good.clone();
    bad_version[4] = 9;
    assert!(matches!(
        l0::decode(&bad_version),
        Err(DataError::FormatMismatch { .. })
    ));

    let mut flipped = good.clone();
    let last_counts_byte = flipped.len() - 3;
    flipped[last_counts_byte] ^= 0xff;
    assert!(matches!(
        l0::decode(&flipped),
        Err(DataError::ChecksumMismatch { index: 2, .. })
    ));

    let truncated = &good[..good.len() - 1];
    assert!(matches!(
        l0::decode(truncated),
        Err(DataError::Truncated { .. })
    ));

    let header_only = l0::encode(sample_epoch(), 3, &[]).expect("encode empty");
    assert!(matches!(
        l0::decode(&header_only),
        Err(DataError::EmptyData { .. })
    ));
}

#[test]
fn l0_encode_rejects_channel_mismatch() {
    let mut packets = sample_packets();
    packets[1].counts.pop();
    assert!(matches!(
        l0::encode(sample_epoch(), 3, &packets),
        Err(DataError::FormatMismatch { .. })
    ));
}

#[test]
fn l0_encode_rejects_pre_epoch_start_time() {
    // The header epoch is unsigned; a pre-1970 time must not wrap into it.
    let before_1970 = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap();
    assert!(matches!(
        l0::encode(before_1970, 3, &sample_packets()),
        Err(DataError::FormatMismatch { .. })
    ));
}

#[test]
fn calibration_artifact_parses_and_checks_window() {
    let text = r#"
        [calibration]
        instrument = "merit"
        applies_to_level = "l0"
        version = 2
        valid_from = "2022-08-01T00:00:00Z"
        valid_until = "2023-01-01T00:00:00Z"
        description = "post-commissioning gains"

        [channels.ch00]
        gain = 1.02
        offset = -0.5

        [channels.ch01]
        gain = 0.97
        offset = 0.0
    "#;

    let artifact: crate::CalibrationData = toml::from_str(text).expect("parse artifact");
    assert_eq!(artifact.calibration.instrument, "merit");
    assert_eq!(artifact.calibration.applies_to_level, DataLevel::L0);
    assert_eq!(artifact.calibration.version, 2);
    assert_eq!(artifact.channels.len(), 2);
    assert_eq!(artifact.channels["ch00"].gain, 1.02);

    assert!(artifact.covers(sample_epoch()));
    assert!(!artifact.covers(Utc.with_ymd_and_hms(2022, 7, 31, 23, 59, 59).unwrap()));
    assert!(!artifact.covers(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()));
}

#[test]
fn calibration_artifact_window_may_be_open_ended() {
    let text = r#"
        [calibration]
        instrument = "merit"
        applies_to_level = "l0"
        version = 1
        valid_from = "2022-08-01T00:00:00Z"
    "#;

    let artifact: crate::CalibrationData = toml::from_str(text).expect("parse artifact");
    assert!(artifact.channels.is_empty());
    assert!(artifact.covers(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()));
}

#[test]
fn load_and_write_round_trip_through_the_filesystem() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bin_path = dir.path().join("hermes_merit_l0_2022239-000000_v01.bin");
    let bytes = l0::encode(sample_epoch(), 3, &sample_packets()).expect("encode");
    std::fs::write(&bin_path, bytes).expect("write fixture");

    let data = load_data_file(&bin_path).expect("load");
    assert_eq!(data.meta.level, DataLevel::L0);
    assert_eq!(data.df.height(), 3);

    let written = write_data_file(&data, dir.path()).expect("write");
    assert_eq!(
        written.file_name().and_then(|n| n.to_str()),
        Some("hermes_merit_l0_2022239-000000_v01.parquet")
    );

    let reloaded = load_data_file(&written).expect("reload");
    assert_eq!(reloaded.meta, data.meta);
    assert!(reloaded.df.equals(&data.df));
}

#[test]
fn load_rejects_unknown_extension_and_mislabeled_binary() {
    let dir = tempfile::tempdir().expect("tempdir");

    let weird = dir.path().join("hermes_merit_l0_2022239-000000_v01.cdf");
    std::fs::write(&weird, b"whatever").expect("write");
    assert!(matches!(
        load_data_file(&weird),
        Err(DataError::UnsupportedExtension { .. })
    ));

    let mislabeled = dir.path().join("hermes_merit_l1_2022239-000000_v01.bin");
    let bytes = l0::encode(sample_epoch(), 3, &sample_packets()).expect("encode");
    std::fs::write(&mislabeled, bytes).expect("write");
    assert!(matches!(
        load_data_file(&mislabeled),
        Err(DataError::FormatMismatch { .. })
    ));
}

#[test]
fn read_calibration_file_reports_parse_errors_with_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("merit_gains_v01.toml");
    std::fs::write(&path, "not = valid = toml").expect("write");

    let err = read_calibration_file(&path).expect_err("should fail");
    assert!(err.to_string().contains("merit_gains_v01.toml"));
}
