mod common;

use approx::assert_abs_diff_eq;
use common::{FC_DIAGONAL, FOCK_DIAGONAL, REF_CMO, RecordWriter};
use dalton_reader::{DaltonError, InterfaceFile, ReaderConfig, Storage, Width};
use tempfile::TempDir;

const EXPECTED_REPORT: &str = include_str!("fixtures/sirifc_report.txt");

fn fixture() -> (TempDir, InterfaceFile) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = common::sirifc().write(dir.path(), "SIRIFC");
    let ifc = InterfaceFile::open(&path).expect("open SIRIFC fixture");
    (dir, ifc)
}

fn open_bytes(writer: &RecordWriter) -> Result<InterfaceFile, DaltonError> {
    open_bytes_with(writer, ReaderConfig::default())
}

fn open_bytes_with(writer: &RecordWriter, config: ReaderConfig) -> Result<InterfaceFile, DaltonError> {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = writer.write(dir.path(), "SIRIFC");
    InterfaceFile::open_with(&path, config)
}

#[test]
fn energies() {
    let (_dir, ifc) = fixture();
    assert_abs_diff_eq!(ifc.potnuc(), 31.249215315972, epsilon = 1e-12);
    assert_abs_diff_eq!(ifc.emy(), -143.60291282551114, epsilon = 1e-12);
    assert_abs_diff_eq!(ifc.eactive(), 0.0);
    assert_abs_diff_eq!(ifc.emcscf(), -112.353697509539, epsilon = 1e-12);
}

#[test]
fn state_and_dimensions() {
    let (_dir, ifc) = fixture();
    assert_eq!(ifc.istate(), 1);
    assert_eq!(ifc.ispin(), 1);
    assert_eq!(ifc.nactel(), 0);
    assert_eq!(ifc.lsym(), 1);
    assert_eq!(ifc.nisht(), 8);
    assert_eq!(ifc.nasht(), 0);
    assert_eq!(ifc.nocct(), 8);
    assert_eq!(ifc.norbt(), 12);
    assert_eq!(ifc.nbast(), 12);
    assert_eq!(ifc.nsym(), 1);
    assert_eq!(ifc.nconf(), 1);
    assert_eq!(ifc.ncmot(), 144);
    assert_eq!(ifc.nnorbt(), 78);
    assert_eq!(ifc.n2orbt(), 144);
    assert_eq!(ifc.nrhf(), &[8, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(ifc.nbas(), &[12, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(ifc.partition().nbas(), &[12]);
    assert_eq!(ifc.partition().norb(), &[12]);
}

#[test]
fn symmetry_table() {
    let (_dir, ifc) = fixture();
    assert_eq!(ifc.muld2h()[0], [1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(ifc.muld2h()[2], [3, 4, 1, 2, 7, 8, 5, 6]);
    assert_eq!(ifc.symmetry_product(2, 3), Some(4));
    assert_eq!(ifc.symmetry_product(8, 8), Some(1));
    assert_eq!(ifc.symmetry_product(0, 1), None);
    assert_eq!(ifc.symmetry_product(9, 1), None);
}

#[test]
fn cmo_matches_reference() {
    let (_dir, ifc) = fixture();
    let cmo = ifc.cmo().subblock(0).unwrap();
    assert_eq!(cmo.shape(), (12, 12));
    for (i, row) in REF_CMO.iter().enumerate() {
        for (j, &expected) in row.iter().enumerate() {
            assert_abs_diff_eq!(cmo.get(i, j).unwrap(), expected, epsilon = 1e-7);
        }
    }
}

#[test]
fn cref_is_single_determinant() {
    let (_dir, ifc) = fixture();
    assert_eq!(ifc.cref(), &[1.0]);
}

#[test]
fn fock_is_diagonal() {
    let (_dir, ifc) = fixture();
    let fock = ifc.fock();
    assert_eq!(fock.storage(), Storage::Full);
    assert_eq!(fock.num_blocks(), 1);
    let block = fock.subblock(0).unwrap();
    for i in 0..12 {
        for j in 0..12 {
            let expected = if i == j { FOCK_DIAGONAL[i] } else { 0.0 };
            assert_abs_diff_eq!(block.get(i, j).unwrap(), expected, epsilon = 1e-8);
        }
    }
}

#[test]
fn empty_active_space() {
    let (_dir, ifc) = fixture();
    assert_eq!(ifc.pv().shape(), (0, 0));
    assert!(ifc.pv().values().is_empty());
    assert_eq!(ifc.dv().shape(), (0, 0));
}

#[test]
fn fc_is_packed_diagonal() {
    let (_dir, ifc) = fixture();
    let fc = ifc.fc();
    assert_eq!(fc.storage(), Storage::Triangular);
    assert_eq!(fc.values().len(), 78);
    assert_eq!(fc.diagonal_values(), FC_DIAGONAL.to_vec());
    let full = fc.unpack().unwrap();
    assert_abs_diff_eq!(full.get(0, 0, 0).unwrap(), -20.31162719);
    assert_abs_diff_eq!(full.get(0, 3, 7).unwrap(), 0.0);
}

#[test]
fn fv_is_zero() {
    let (_dir, ifc) = fixture();
    assert_eq!(ifc.fv().values().len(), 78);
    assert!(ifc.fv().values().iter().all(|&v| v == 0.0));
}

#[test]
fn report_text() {
    let (_dir, ifc) = fixture();
    assert_eq!(ifc.to_string(), EXPECTED_REPORT);
    assert_eq!(ifc.to_text(), EXPECTED_REPORT);
}

#[test]
fn property_file_is_not_an_interface_file() {
    let err = open_bytes(&common::aoproper()).unwrap_err();
    match err {
        DaltonError::FormatMismatch { expected, found } => {
            assert_eq!(expected, "SIR IPH");
            assert_eq!(found, "XDIPLEN");
        }
        other => panic!("expected FormatMismatch, got {:?}", other),
    }
}

#[test]
fn unlabeled_first_record_is_rejected() {
    let writer = RecordWriter::new().doubles(&[1.0, 2.0]);
    assert!(matches!(open_bytes(&writer), Err(DaltonError::FormatMismatch { .. })));
}

#[test]
fn empty_file_is_missing_record() {
    assert!(matches!(open_bytes(&RecordWriter::new()), Err(DaltonError::MissingRecord(_))));
}

#[test]
fn truncated_schema_is_missing_record() {
    let writer = common::sirifc_head().doubles(&common::cmo_values());
    assert!(matches!(open_bytes(&writer), Err(DaltonError::MissingRecord(_))));
}

#[test]
fn wrong_array_length_is_decode_error() {
    let writer = common::sirifc_head().doubles(&[0.0; 143]);
    let err = open_bytes(&writer).unwrap_err();
    assert!(err.is_decode(), "{:?}", err);
    assert!(matches!(err, DaltonError::SizeMismatch { expected: 1152, found: 1144, .. }));
}

#[test]
fn short_energy_record_is_decode_error() {
    let writer = RecordWriter::new()
        .label("16Oct26", "12:00:00", "SIR IPH")
        .doubles(&[1.0, 2.0]);
    assert!(open_bytes(&writer).unwrap_err().is_decode());
}

#[test]
fn inconsistent_partition_is_decode_error() {
    let writer = RecordWriter::new()
        .label("16Oct26", "12:00:00", "SIR IPH")
        .record(&common::energies_payload())
        .record(&common::dimensions_payload_with(1, 11, 12));
    assert!(open_bytes(&writer).unwrap_err().is_decode());
}

#[test]
fn nsym_out_of_range_is_decode_error() {
    for nsym in [0, 9] {
        let writer = RecordWriter::new()
            .label("16Oct26", "12:00:00", "SIR IPH")
            .record(&common::energies_payload())
            .record(&common::dimensions_payload_with(nsym, 12, 12));
        assert!(open_bytes(&writer).unwrap_err().is_decode(), "nsym = {}", nsym);
    }
}

#[test]
fn broken_framing_is_decode_error() {
    let full = common::sirifc();
    let bytes = full.bytes();
    let writer = RecordWriter::new().raw(&bytes[..bytes.len() - 2]);
    assert!(open_bytes(&writer).unwrap_err().is_decode());
}

#[test]
fn eight_byte_markers_need_matching_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::sirifc().write(dir.path(), "SIRIFC");
    let config = ReaderConfig::new(Width::Eight, Width::Four);
    assert!(InterfaceFile::open_with(&path, config).is_err());
}

#[test]
fn eight_byte_markers_with_four_byte_integers() {
    let config = ReaderConfig::new(Width::Eight, Width::Four);
    let ifc = open_bytes_with(&common::sirifc_with(8, 4), config).expect("open 8/4 SIRIFC");
    assert_abs_diff_eq!(ifc.potnuc(), common::POTNUC, epsilon = 1e-12);
    assert_eq!(ifc.nbast(), 12);
    assert_eq!(ifc.to_text(), EXPECTED_REPORT);
}

#[test]
fn four_byte_markers_with_eight_byte_integers() {
    let config = ReaderConfig::new(Width::Four, Width::Eight);
    let ifc = open_bytes_with(&common::sirifc_with(4, 8), config).expect("open 4/8 SIRIFC");
    assert_abs_diff_eq!(ifc.emcscf(), common::EMCSCF, epsilon = 1e-12);
    assert_eq!(ifc.istate(), 1);
    assert_eq!(ifc.ncmot(), 144);
    assert_eq!(ifc.muld2h()[2], [3, 4, 1, 2, 7, 8, 5, 6]);
    assert_eq!(ifc.to_text(), EXPECTED_REPORT);
}

#[test]
fn eight_byte_integers_read_as_four_are_rejected() {
    assert!(open_bytes(&common::sirifc_with(4, 8)).is_err());
}

#[test]
fn oversized_partition_is_decode_error() {
    let huge = 1i64 << 40;
    let mut ints = common::dimensions_ints();
    for at in [common::NBAS_AT, common::NORB_AT, common::NBAST_AT, common::NORBT_AT] {
        ints[at] = huge;
    }
    let writer = RecordWriter::new()
        .label("16Oct26", "12:00:00", "SIR IPH")
        .record(&common::energies_payload_with(8))
        .record(&common::int_bytes(&ints, 8));
    let config = ReaderConfig::new(Width::Four, Width::Eight);
    let err = open_bytes_with(&writer, config).unwrap_err();
    assert!(err.is_decode(), "{:?}", err);
    assert!(err.to_string().contains("overflows"), "{}", err);
}
