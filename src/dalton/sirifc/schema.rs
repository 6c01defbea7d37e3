//! Record schema of the SIRIFC interface file.
//!
//! The writing program emits a fixed sequence of records after the `SIR IPH`
//! label record. The order lives in [`RECORD_SCHEMA`]; the scalar records are
//! described field by field in [`ENERGY_FIELDS`] and [`DIMENSION_FIELDS`].
//!
//! ```text
//! ┌──────────────┐
//! │ SIR IPH      │ label record (checked before the schema starts)
//! ├──────────────┤
//! │ Energies     │ 4 doubles, 4 integers
//! │ Dimensions   │ counts, MULD2H, per-symmetry arrays
//! │ CMO          │ NCMOT doubles
//! │ CREF         │ NCONF doubles
//! │ DV           │ NNASHX doubles
//! │ FOCK         │ N2ORBT doubles
//! │ PV           │ NNASHX^2 doubles
//! │ FC           │ NNORBT doubles
//! │ FV           │ NNORBT doubles
//! └──────────────┘
//! ```

use log::warn;

use crate::dalton::types::error::{DaltonError, Result};
use crate::dalton::types::models::{MAX_SYMMETRIES, Storage, SymmetryPartition, Width};
use crate::dalton::utils;

/// Label that identifies an interface file.
pub const IFC_LABEL: &str = "SIR IPH";

/// On-disk type of one scalar-record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Int,
    IntArray(usize),
}

/// One named field of a scalar record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

const PER_SYM: FieldKind = FieldKind::IntArray(MAX_SYMMETRIES);

pub const ENERGY_FIELDS: &[FieldSpec] = &[
    field("POTNUC", FieldKind::Float),
    field("EMY", FieldKind::Float),
    field("EACTIVE", FieldKind::Float),
    field("EMCSCF", FieldKind::Float),
    field("ISTATE", FieldKind::Int),
    field("ISPIN", FieldKind::Int),
    field("NACTEL", FieldKind::Int),
    field("LSYM", FieldKind::Int),
];

pub const DIMENSION_FIELDS: &[FieldSpec] = &[
    field("NISHT", FieldKind::Int),
    field("NASHT", FieldKind::Int),
    field("NOCCT", FieldKind::Int),
    field("NORBT", FieldKind::Int),
    field("NBAST", FieldKind::Int),
    field("NCONF", FieldKind::Int),
    field("NWOPT", FieldKind::Int),
    field("NWOPH", FieldKind::Int),
    field("NCDETS", FieldKind::Int),
    field("NCMOT", FieldKind::Int),
    field("NNASHX", FieldKind::Int),
    field("NNASHY", FieldKind::Int),
    field("NNORBT", FieldKind::Int),
    field("N2ORBT", FieldKind::Int),
    field("NSYM", FieldKind::Int),
    field("MULD2H", FieldKind::IntArray(MAX_SYMMETRIES * MAX_SYMMETRIES)),
    field("NRHF", PER_SYM),
    field("NFRO", PER_SYM),
    field("NISH", PER_SYM),
    field("NASH", PER_SYM),
    field("NORB", PER_SYM),
    field("NBAS", PER_SYM),
    field("NELMN1", FieldKind::Int),
    field("NELMX1", FieldKind::Int),
    field("NELMN3", FieldKind::Int),
    field("NELMX3", FieldKind::Int),
    field("MCTYPE", FieldKind::Int),
    field("NAS1", PER_SYM),
    field("NAS2", PER_SYM),
    field("NAS3", PER_SYM),
];

/// Array records that follow the scalar records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayGroup {
    Cmo,
    Cref,
    Dv,
    Fock,
    Pv,
    Fc,
    Fv,
}

impl ArrayGroup {
    pub fn name(&self) -> &'static str {
        match self {
            ArrayGroup::Cmo => "CMO",
            ArrayGroup::Cref => "CREF",
            ArrayGroup::Dv => "DV",
            ArrayGroup::Fock => "FOCK",
            ArrayGroup::Pv => "PV",
            ArrayGroup::Fc => "FC",
            ArrayGroup::Fv => "FV",
        }
    }

    /// Number of doubles the record must hold, from the already decoded dimensions.
    pub fn element_count(&self, dims: &Dimensions) -> Result<usize> {
        match self {
            ArrayGroup::Cmo => Ok(dims.ncmot),
            ArrayGroup::Cref => Ok(dims.nconf),
            ArrayGroup::Dv => Ok(dims.nnashx),
            ArrayGroup::Fock => Ok(dims.n2orbt),
            ArrayGroup::Pv => Storage::Full
                .checked_element_count(dims.nnashx, dims.nnashx)
                .ok_or_else(|| {
                    DaltonError::Decode(format!("PV size NNASHX^2 overflows for NNASHX {}", dims.nnashx))
                }),
            ArrayGroup::Fc | ArrayGroup::Fv => Ok(dims.nnorbt),
        }
    }
}

/// One entry of the record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Energies,
    Dimensions,
    Array(ArrayGroup),
}

impl Group {
    pub fn name(&self) -> &'static str {
        match self {
            Group::Energies => "energies",
            Group::Dimensions => "dimensions",
            Group::Array(array) => array.name(),
        }
    }
}

/// Records after the label record, in on-disk order.
pub const RECORD_SCHEMA: &[Group] = &[
    Group::Energies,
    Group::Dimensions,
    Group::Array(ArrayGroup::Cmo),
    Group::Array(ArrayGroup::Cref),
    Group::Array(ArrayGroup::Dv),
    Group::Array(ArrayGroup::Fock),
    Group::Array(ArrayGroup::Pv),
    Group::Array(ArrayGroup::Fc),
    Group::Array(ArrayGroup::Fv),
];

/// A decoded scalar field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Int(i64),
    IntArray(Vec<i64>),
}

/// Decoded scalar record, looked up by field name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValues {
    group: &'static str,
    values: Vec<(&'static str, FieldValue)>,
}

impl FieldValues {
    fn lookup(&self, name: &str) -> Result<&FieldValue> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| DaltonError::Decode(format!("Field {} not in {} record", name, self.group)))
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        match self.lookup(name)? {
            FieldValue::Float(v) => Ok(*v),
            other => Err(self.kind_error(name, other)),
        }
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        match self.lookup(name)? {
            FieldValue::Int(v) => Ok(*v),
            other => Err(self.kind_error(name, other)),
        }
    }

    /// An integer field that must be a non-negative count.
    pub fn count(&self, name: &str) -> Result<usize> {
        let value = self.int(name)?;
        usize::try_from(value)
            .map_err(|_| DaltonError::Decode(format!("Negative count {} for {}", value, name)))
    }

    pub fn ints(&self, name: &str) -> Result<&[i64]> {
        match self.lookup(name)? {
            FieldValue::IntArray(v) => Ok(v),
            other => Err(self.kind_error(name, other)),
        }
    }

    /// A per-symmetry array of non-negative counts.
    pub fn counts(&self, name: &str) -> Result<[usize; MAX_SYMMETRIES]> {
        let values = self.ints(name)?;
        let mut out = [0usize; MAX_SYMMETRIES];
        if values.len() != MAX_SYMMETRIES {
            return Err(DaltonError::Decode(format!(
                "{} has {} entries, expected {}",
                name,
                values.len(),
                MAX_SYMMETRIES
            )));
        }
        for (slot, &v) in out.iter_mut().zip(values) {
            *slot = usize::try_from(v)
                .map_err(|_| DaltonError::Decode(format!("Negative count {} in {}", v, name)))?;
        }
        Ok(out)
    }

    fn kind_error(&self, name: &str, found: &FieldValue) -> DaltonError {
        DaltonError::Decode(format!(
            "Field {} of {} record has unexpected kind {:?}",
            name, self.group, found
        ))
    }
}

/// Decodes a scalar record against its field descriptors.
///
/// A record shorter than the descriptors is a decode error. Trailing bytes
/// beyond the last descriptor are ignored.
pub fn decode_fields(
    bytes: &[u8],
    fields: &[FieldSpec],
    integer_width: Width,
    group: &'static str,
) -> Result<FieldValues> {
    let needed = record_len(fields, integer_width);
    if bytes.len() < needed {
        return Err(DaltonError::Decode(format!(
            "{} record too short: need {} bytes, found {}",
            group,
            needed,
            bytes.len()
        )));
    }
    let mut reader = bytes;
    let mut values = Vec::with_capacity(fields.len());
    for desc in fields {
        let value = match desc.kind {
            FieldKind::Float => FieldValue::Float(utils::read_f64(&mut reader, desc.name)?),
            FieldKind::Int => FieldValue::Int(utils::read_int(&mut reader, integer_width, desc.name)?),
            FieldKind::IntArray(n) => FieldValue::IntArray(
                (0..n)
                    .map(|_| utils::read_int(&mut reader, integer_width, desc.name))
                    .collect::<Result<_>>()?,
            ),
        };
        values.push((desc.name, value));
    }
    if !reader.is_empty() {
        warn!("{} record: ignoring {} trailing bytes", group, reader.len());
    }
    Ok(FieldValues { group, values })
}

/// Byte length of a scalar record as described by `fields`.
pub fn record_len(fields: &[FieldSpec], integer_width: Width) -> usize {
    fields
        .iter()
        .map(|f| match f.kind {
            FieldKind::Float => 8,
            FieldKind::Int => integer_width.bytes(),
            FieldKind::IntArray(n) => n * integer_width.bytes(),
        })
        .sum()
}

/// Energies and state selection from the first scalar record.
#[derive(Debug, Clone, PartialEq)]
pub struct Energies {
    pub potnuc: f64,
    pub emy: f64,
    pub eactive: f64,
    pub emcscf: f64,
    pub istate: i64,
    pub ispin: i64,
    pub nactel: i64,
    pub lsym: i64,
}

impl Energies {
    pub fn from_fields(fields: &FieldValues) -> Result<Self> {
        Ok(Self {
            potnuc: fields.float("POTNUC")?,
            emy: fields.float("EMY")?,
            eactive: fields.float("EACTIVE")?,
            emcscf: fields.float("EMCSCF")?,
            istate: fields.int("ISTATE")?,
            ispin: fields.int("ISPIN")?,
            nactel: fields.int("NACTEL")?,
            lsym: fields.int("LSYM")?,
        })
    }
}

/// Orbital-space dimensions from the second scalar record.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimensions {
    pub nisht: usize,
    pub nasht: usize,
    pub nocct: usize,
    pub norbt: usize,
    pub nbast: usize,
    pub nconf: usize,
    pub nwopt: usize,
    pub nwoph: usize,
    pub ncdets: usize,
    pub ncmot: usize,
    pub nnashx: usize,
    pub nnashy: usize,
    pub nnorbt: usize,
    pub n2orbt: usize,
    pub nsym: usize,
    /// Symmetry multiplication table, `muld2h[i][j]` is the 1-based product of irreps `i+1` and `j+1`.
    pub muld2h: [[usize; MAX_SYMMETRIES]; MAX_SYMMETRIES],
    pub nrhf: [usize; MAX_SYMMETRIES],
    pub nfro: [usize; MAX_SYMMETRIES],
    pub nish: [usize; MAX_SYMMETRIES],
    pub nash: [usize; MAX_SYMMETRIES],
    pub norb: [usize; MAX_SYMMETRIES],
    pub nbas: [usize; MAX_SYMMETRIES],
    pub nelmn1: i64,
    pub nelmx1: i64,
    pub nelmn3: i64,
    pub nelmx3: i64,
    pub mctype: i64,
    pub nas1: [usize; MAX_SYMMETRIES],
    pub nas2: [usize; MAX_SYMMETRIES],
    pub nas3: [usize; MAX_SYMMETRIES],
    pub partition: SymmetryPartition,
}

impl Dimensions {
    /// Builds the dimensions and checks them against each other.
    pub fn from_fields(fields: &FieldValues) -> Result<Self> {
        let nsym = fields.count("NSYM")?;
        if !(1..=MAX_SYMMETRIES).contains(&nsym) {
            return Err(DaltonError::Decode(format!(
                "NSYM is {}, expected 1..={}",
                nsym, MAX_SYMMETRIES
            )));
        }

        // MULD2H(8,8) is column-major on disk.
        let table = fields.ints("MULD2H")?;
        let mut muld2h = [[0usize; MAX_SYMMETRIES]; MAX_SYMMETRIES];
        for (i, row) in muld2h.iter_mut().enumerate() {
            for (j, slot) in row.iter_mut().enumerate() {
                let v = table[i + j * MAX_SYMMETRIES];
                *slot = usize::try_from(v)
                    .map_err(|_| DaltonError::Decode(format!("Negative entry {} in MULD2H", v)))?;
            }
        }

        let nbast = fields.count("NBAST")?;
        let norbt = fields.count("NORBT")?;
        let nbas = fields.counts("NBAS")?;
        let norb = fields.counts("NORB")?;
        let partition =
            SymmetryPartition::new(nbas[..nsym].to_vec(), norb[..nsym].to_vec(), nbast, norbt)?;

        let dims = Self {
            nisht: fields.count("NISHT")?,
            nasht: fields.count("NASHT")?,
            nocct: fields.count("NOCCT")?,
            norbt,
            nbast,
            nconf: fields.count("NCONF")?,
            nwopt: fields.count("NWOPT")?,
            nwoph: fields.count("NWOPH")?,
            ncdets: fields.count("NCDETS")?,
            ncmot: fields.count("NCMOT")?,
            nnashx: fields.count("NNASHX")?,
            nnashy: fields.count("NNASHY")?,
            nnorbt: fields.count("NNORBT")?,
            n2orbt: fields.count("N2ORBT")?,
            nsym,
            muld2h,
            nrhf: fields.counts("NRHF")?,
            nfro: fields.counts("NFRO")?,
            nish: fields.counts("NISH")?,
            nash: fields.counts("NASH")?,
            norb,
            nbas,
            nelmn1: fields.int("NELMN1")?,
            nelmx1: fields.int("NELMX1")?,
            nelmn3: fields.int("NELMN3")?,
            nelmx3: fields.int("NELMX3")?,
            mctype: fields.int("MCTYPE")?,
            nas1: fields.counts("NAS1")?,
            nas2: fields.counts("NAS2")?,
            nas3: fields.counts("NAS3")?,
            partition,
        };
        dims.check_consistency()?;
        Ok(dims)
    }

    fn check_consistency(&self) -> Result<()> {
        let nnashx = Storage::Triangular
            .checked_element_count(self.nasht, self.nasht)
            .ok_or_else(|| DaltonError::Decode(format!("NNASHX overflows for NASHT {}", self.nasht)))?;
        let checks = [
            ("NCMOT", self.ncmot, self.partition.coefficient_count()),
            ("N2ORBT", self.n2orbt, self.partition.square_orbital_count()),
            ("NNORBT", self.nnorbt, self.partition.packed_orbital_count()),
            ("NNASHX", self.nnashx, nnashx),
        ];
        for (name, declared, derived) in checks {
            if declared != derived {
                return Err(DaltonError::Decode(format!(
                    "{} is {}, but the symmetry partition implies {}",
                    name, declared, derived
                )));
            }
        }
        Ok(())
    }
}
