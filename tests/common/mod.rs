//! Builders for small Dalton-style binary files used by the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Accumulates Fortran sequential records with little-endian length markers.
pub struct RecordWriter {
    bytes: Vec<u8>,
    marker_width: usize,
}

impl Default for RecordWriter {
    fn default() -> Self {
        Self::with_marker_width(4)
    }
}

impl RecordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer framing records with 4- or 8-byte markers.
    pub fn with_marker_width(marker_width: usize) -> Self {
        assert!(marker_width == 4 || marker_width == 8, "marker width must be 4 or 8");
        Self {
            bytes: Vec::new(),
            marker_width,
        }
    }

    pub fn record(mut self, payload: &[u8]) -> Self {
        let marker = (payload.len() as u64).to_le_bytes();
        let marker = &marker[..self.marker_width];
        self.bytes.extend_from_slice(marker);
        self.bytes.extend_from_slice(payload);
        self.bytes.extend_from_slice(marker);
        self
    }

    pub fn label(self, stamp: &str, tag: &str, name: &str) -> Self {
        let payload = label_payload(stamp, tag, name);
        self.record(&payload)
    }

    pub fn doubles(self, values: &[f64]) -> Self {
        self.record(&f64_bytes(values))
    }

    /// Appends raw bytes without framing, e.g. to truncate or corrupt a file.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, &self.bytes).expect("write fixture file");
        path
    }
}

fn pad8(text: &str) -> String {
    format!("{:<8}", text)
}

pub fn label_payload(stamp: &str, tag: &str, name: &str) -> Vec<u8> {
    let text = format!("********{}{}{}", pad8(stamp), pad8(tag), pad8(name));
    assert_eq!(text.len(), 32, "label fields must fit in 8 characters");
    text.into_bytes()
}

pub fn f64_bytes(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Integers as 4- or 8-byte little-endian values.
pub fn int_bytes(values: &[i64], width: usize) -> Vec<u8> {
    match width {
        4 => values.iter().flat_map(|&v| (v as i32).to_le_bytes()).collect(),
        8 => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        _ => panic!("integer width must be 4 or 8"),
    }
}

// ---------------------------------------------------------------------------
// SIRIFC fixture: closed-shell SCF, 12 basis functions, no symmetry.
// ---------------------------------------------------------------------------

pub const POTNUC: f64 = 31.249215315972;
pub const EMY: f64 = -143.60291282551114;
pub const EMCSCF: f64 = -112.353697509539;

/// MO coefficients, rows are basis functions and columns orbitals.
pub const REF_CMO: [[f64; 12]; 12] = [
    [-0.00052699, -0.99261439, 0.12383359, 0.18555802, 0.00057906, -0.03008591, 0.00000525, -0.00032083, -0.00001086, -0.20197798, 0.00462897, -0.10720540],
    [0.00737583, -0.03297262, -0.27793974, -0.57839124, -0.00189817, 0.09379878, -0.00002193, 0.00213570, 0.00006014, 1.26291782, -0.03157479, 0.72473780],
    [-0.00000006, 0.00000034, 0.00000174, 0.00001207, -0.00000021, 0.00001577, -0.61047733, 0.00000024, 0.82117352, -0.00007631, 0.00000107, -0.00000241],
    [-0.00001516, 0.00002433, 0.00014992, -0.00142334, 0.53199496, 0.00597361, -0.00000010, -0.18011818, 0.00000020, -0.01026909, -1.15947841, -0.03615204],
    [0.00636525, -0.00081783, -0.15880295, 0.22231084, -0.00480339, 0.44843744, 0.00001484, -0.00156991, -0.00002782, -0.49164118, -0.02356105, 1.14905324],
    [-0.99427109, -0.00011729, 0.21888547, -0.10086099, -0.00150002, 0.09267643, 0.00000036, 0.00014951, 0.00000066, 0.02177132, -0.00369526, 0.11807975],
    [-0.02609688, 0.00584164, -0.76504310, 0.43932688, 0.00767818, -0.49482810, -0.00000310, -0.00076894, -0.00000161, -0.11725264, 0.02605872, -0.88618237],
    [-0.00000004, -0.00000001, -0.00000050, 0.00000336, -0.00000016, 0.00001334, -0.67317247, -0.00000011, -0.77061491, 0.00003093, -0.00000010, -0.00001058],
    [-0.00000175, 0.00000508, 0.00003637, -0.00011893, 0.43867722, 0.00738524, 0.00000019, 0.87245053, -0.00000035, 0.00104585, 0.31891087, 0.00852617],
    [0.00572834, -0.00164157, 0.17319132, 0.17014988, 0.00631320, -0.67884912, -0.00002075, 0.00453149, 0.00000552, 0.19185230, -0.03015682, 0.93896261],
    [-0.00022781, 0.00650112, -0.03189527, -0.26702488, 0.29798906, -0.16111049, -0.00000255, -0.35516810, -0.00003335, -0.89167912, 0.84514752, 0.12270512],
    [-0.00026105, 0.00649966, -0.03167323, -0.26196797, -0.29964271, -0.16250671, -0.00000228, 0.35940112, -0.00003302, -0.89524480, -0.84083843, 0.06116855],
];

pub const FOCK_DIAGONAL: [f64; 12] = [
    -40.62325438, -22.25084656, -2.68385608, -1.60738397, -1.27752650, -1.08854783, -0.89243173,
    -0.70725144, 0.0, 0.0, 0.0, 0.0,
];

pub const FC_DIAGONAL: [f64; 12] = [
    -20.31162719, -11.12542328, -1.34192804, -0.80369198, -0.63876325, -0.54427391, -0.44621587,
    -0.35362572, 0.28583524, 0.62008686, 0.74574226, 0.92100240,
];

const N: usize = 12;

pub fn energies_payload() -> Vec<u8> {
    energies_payload_with(4)
}

pub fn energies_payload_with(int_width: usize) -> Vec<u8> {
    let mut bytes = f64_bytes(&[POTNUC, EMY, 0.0, EMCSCF]);
    // ISTATE ISPIN NACTEL LSYM
    bytes.extend(int_bytes(&[1, 1, 0, 1], int_width));
    bytes
}

// Positions inside the dimensions record.
pub const NORBT_AT: usize = 3;
pub const NBAST_AT: usize = 4;
pub const NSYM_AT: usize = 14;
pub const NORB_AT: usize = 15 + 64 + 4 * 8;
pub const NBAS_AT: usize = 15 + 64 + 5 * 8;

/// The integers of a consistent dimensions record.
pub fn dimensions_ints() -> Vec<i64> {
    let n = N as i64;
    // NISHT NASHT NOCCT NORBT NBAST NCONF NWOPT NWOPH NCDETS NCMOT NNASHX NNASHY NNORBT N2ORBT NSYM
    let mut ints = vec![8, 0, 8, n, n, 1, 32, 32, 1, n * n, 0, 0, n * (n + 1) / 2, n * n, 1];
    // MULD2H, column-major
    for j in 0..8 {
        for i in 0..8 {
            ints.push(((i ^ j) + 1) as i64);
        }
    }
    let per_sym = |first: i64| {
        let mut v = vec![0; 8];
        v[0] = first;
        v
    };
    ints.extend(per_sym(8)); // NRHF
    ints.extend(per_sym(0)); // NFRO
    ints.extend(per_sym(8)); // NISH
    ints.extend(per_sym(0)); // NASH
    ints.extend(per_sym(n)); // NORB
    ints.extend(per_sym(n)); // NBAS
    ints.extend([0, 0, 0, 0, 0]); // NELMN1 NELMX1 NELMN3 NELMX3 MCTYPE
    ints.extend([0; 24]); // NAS1 NAS2 NAS3
    ints
}

/// The dimensions record, with `nsym`/`nbas`/`norb` overridable for corruption tests.
pub fn dimensions_payload_with(nsym: i64, nbas0: i64, norb0: i64) -> Vec<u8> {
    let mut ints = dimensions_ints();
    ints[NSYM_AT] = nsym;
    ints[NBAS_AT] = nbas0;
    ints[NORB_AT] = norb0;
    int_bytes(&ints, 4)
}

pub fn dimensions_payload() -> Vec<u8> {
    int_bytes(&dimensions_ints(), 4)
}

/// CMO in column-major order, as written by the producing program.
pub fn cmo_values() -> Vec<f64> {
    let mut values = Vec::with_capacity(N * N);
    for j in 0..N {
        for row in &REF_CMO {
            values.push(row[j]);
        }
    }
    values
}

pub fn fock_values() -> Vec<f64> {
    let mut values = vec![0.0; N * N];
    for (i, &d) in FOCK_DIAGONAL.iter().enumerate() {
        values[i + i * N] = d;
    }
    values
}

pub fn packed_diagonal(diagonal: &[f64]) -> Vec<f64> {
    let mut values = Vec::new();
    for (i, &d) in diagonal.iter().enumerate() {
        values.extend(std::iter::repeat_n(0.0, i));
        values.push(d);
    }
    values
}

/// Writer holding the label record and both scalar records.
pub fn sirifc_head() -> RecordWriter {
    RecordWriter::new()
        .label("16Oct26", "12:00:00", "SIR IPH")
        .record(&energies_payload())
        .record(&dimensions_payload())
}

/// A complete, consistent interface file.
pub fn sirifc() -> RecordWriter {
    sirifc_with(4, 4)
}

/// The same interface file written with other marker and integer widths.
pub fn sirifc_with(marker_width: usize, int_width: usize) -> RecordWriter {
    RecordWriter::with_marker_width(marker_width)
        .label("16Oct26", "12:00:00", "SIR IPH")
        .record(&energies_payload_with(int_width))
        .record(&int_bytes(&dimensions_ints(), int_width))
        .doubles(&cmo_values()) // CMO
        .doubles(&[1.0]) // CREF
        .doubles(&[]) // DV
        .doubles(&fock_values()) // FOCK
        .doubles(&[]) // PV
        .doubles(&packed_diagonal(&FC_DIAGONAL)) // FC
        .doubles(&vec![0.0; N * (N + 1) / 2]) // FV
}

// ---------------------------------------------------------------------------
// AOPROPER fixture: dipole integrals for 3 basis functions.
// ---------------------------------------------------------------------------

pub const XDIPLEN: [f64; 6] = [0.0, 0.0, 0.0, 0.62318216, 2.0, 0.0];
pub const YDIPLEN: [f64; 6] = [-0.22490589, 0.42047202, 2.63189861, 0.0, 0.0, 0.96659568];
pub const ZDIPLEN: [f64; 6] = [0.0; 6];
pub const XANGMOM: [f64; 6] = [0.0, 0.5, 0.0, -0.25, 0.75, 0.0];
pub const SQUARE_OP: [f64; 9] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];

pub fn aoproper() -> RecordWriter {
    aoproper_with(4)
}

pub fn aoproper_with(marker_width: usize) -> RecordWriter {
    RecordWriter::with_marker_width(marker_width)
        .label("16Oct26", "SYMMETRI", "XDIPLEN")
        .doubles(&XDIPLEN)
        .label("16Oct26", "SYMMETRI", "YDIPLEN")
        .doubles(&YDIPLEN)
        .label("16Oct26", "SYMMETRI", "ZDIPLEN")
        .doubles(&ZDIPLEN)
        .label("16Oct26", "ANTISYMM", "XANGMOM")
        .doubles(&XANGMOM)
        .label("16Oct26", "SQUARE", "SQOP")
        .doubles(&SQUARE_OP)
}
