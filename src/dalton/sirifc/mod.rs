//! SIRIFC interface file reader.

pub mod report;
pub mod schema;

use std::path::Path;
use log::{debug, info};

use crate::dalton::format::record::RecordReader;
use crate::dalton::matrix::MatrixBlock;
use crate::dalton::types::error::{DaltonError, Result};
use crate::dalton::types::models::{MAX_SYMMETRIES, ReaderConfig, Storage, SymmetryPartition};
use crate::dalton::utils;
use schema::{ArrayGroup, DIMENSION_FIELDS, Dimensions, ENERGY_FIELDS, Energies, Group, IFC_LABEL, RECORD_SCHEMA};

/// Wavefunction metadata and orbital matrices read from an interface file.
///
/// Constructed once by [`InterfaceFile::open`]; immutable afterwards and safe
/// to share between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceFile {
    energies: Energies,
    dims: Dimensions,
    cmo: MatrixBlock,
    cref: Vec<f64>,
    dv: MatrixBlock,
    fock: MatrixBlock,
    pv: MatrixBlock,
    fc: MatrixBlock,
    fv: MatrixBlock,
}

impl InterfaceFile {
    /// Reads an interface file written with 4-byte markers and integers.
    ///
    /// # Errors
    /// - `FormatMismatch` if the first record is not the `SIR IPH` label
    /// - `Decode`/`SizeMismatch` if a record does not fit the schema
    /// - `MissingRecord` if the file ends early
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, ReaderConfig::default())
    }

    /// Reads an interface file with an explicit record/integer layout.
    pub fn open_with(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening interface file: {}", path.display());
        let mut records = RecordReader::with_config(path, config).records()?;

        let first = records.next().ok_or_else(|| {
            DaltonError::MissingRecord(format!("{} label record in {}", IFC_LABEL, path.display()))
        })??;
        match first.label() {
            Some(label) if label.matches(IFC_LABEL) => {
                debug!("Interface label found (stamp '{}', tag '{}')", label.stamp, label.tag);
            }
            Some(label) => {
                return Err(DaltonError::FormatMismatch {
                    expected: IFC_LABEL.to_string(),
                    found: label.name,
                });
            }
            None => {
                return Err(DaltonError::FormatMismatch {
                    expected: IFC_LABEL.to_string(),
                    found: format!("unlabeled record of {} bytes", first.len()),
                });
            }
        }

        let mut builder = Builder::default();
        for group in RECORD_SCHEMA {
            let record = records.next().ok_or_else(|| {
                DaltonError::MissingRecord(format!("{} record in {}", group.name(), path.display()))
            })??;
            debug!("Decoding {} from record {} ({} bytes)", group.name(), record.index, record.len());
            builder.decode(*group, &record.bytes, config)?;
        }

        let ifc = builder.finish()?;
        info!(
            "Interface file loaded: nsym={}, nbast={}, norbt={}, nisht={}, nasht={}",
            ifc.dims.nsym, ifc.dims.nbast, ifc.dims.norbt, ifc.dims.nisht, ifc.dims.nasht
        );
        Ok(ifc)
    }

    /// Canonical multi-line report; identical to the `Display` output.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Nuclear repulsion energy.
    pub fn potnuc(&self) -> f64 {
        self.energies.potnuc
    }

    /// Total electronic energy.
    pub fn emy(&self) -> f64 {
        self.energies.emy
    }

    /// Active-space energy.
    pub fn eactive(&self) -> f64 {
        self.energies.eactive
    }

    /// Final MCSCF (or SCF) energy.
    pub fn emcscf(&self) -> f64 {
        self.energies.emcscf
    }

    pub fn istate(&self) -> i64 {
        self.energies.istate
    }

    pub fn ispin(&self) -> i64 {
        self.energies.ispin
    }

    pub fn nactel(&self) -> i64 {
        self.energies.nactel
    }

    /// Spatial symmetry of the target state (1-based).
    pub fn lsym(&self) -> i64 {
        self.energies.lsym
    }

    pub fn nisht(&self) -> usize {
        self.dims.nisht
    }

    pub fn nasht(&self) -> usize {
        self.dims.nasht
    }

    pub fn nocct(&self) -> usize {
        self.dims.nocct
    }

    pub fn norbt(&self) -> usize {
        self.dims.norbt
    }

    pub fn nbast(&self) -> usize {
        self.dims.nbast
    }

    pub fn nsym(&self) -> usize {
        self.dims.nsym
    }

    pub fn nconf(&self) -> usize {
        self.dims.nconf
    }

    pub fn nwopt(&self) -> usize {
        self.dims.nwopt
    }

    pub fn nwoph(&self) -> usize {
        self.dims.nwoph
    }

    pub fn ncdets(&self) -> usize {
        self.dims.ncdets
    }

    pub fn ncmot(&self) -> usize {
        self.dims.ncmot
    }

    pub fn nnashx(&self) -> usize {
        self.dims.nnashx
    }

    pub fn nnashy(&self) -> usize {
        self.dims.nnashy
    }

    pub fn nnorbt(&self) -> usize {
        self.dims.nnorbt
    }

    pub fn n2orbt(&self) -> usize {
        self.dims.n2orbt
    }

    /// The full 8x8 symmetry multiplication table as stored on disk.
    pub fn muld2h(&self) -> &[[usize; MAX_SYMMETRIES]; MAX_SYMMETRIES] {
        &self.dims.muld2h
    }

    /// Product of two 1-based irreps, `None` outside `1..=8`.
    pub fn symmetry_product(&self, a: usize, b: usize) -> Option<usize> {
        if a == 0 || b == 0 {
            return None;
        }
        self.dims.muld2h.get(a - 1)?.get(b - 1).copied()
    }

    pub fn nrhf(&self) -> &[usize; MAX_SYMMETRIES] {
        &self.dims.nrhf
    }

    pub fn nfro(&self) -> &[usize; MAX_SYMMETRIES] {
        &self.dims.nfro
    }

    pub fn nish(&self) -> &[usize; MAX_SYMMETRIES] {
        &self.dims.nish
    }

    pub fn nash(&self) -> &[usize; MAX_SYMMETRIES] {
        &self.dims.nash
    }

    pub fn norb(&self) -> &[usize; MAX_SYMMETRIES] {
        &self.dims.norb
    }

    pub fn nbas(&self) -> &[usize; MAX_SYMMETRIES] {
        &self.dims.nbas
    }

    pub fn nelmn1(&self) -> i64 {
        self.dims.nelmn1
    }

    pub fn nelmx1(&self) -> i64 {
        self.dims.nelmx1
    }

    pub fn nelmn3(&self) -> i64 {
        self.dims.nelmn3
    }

    pub fn nelmx3(&self) -> i64 {
        self.dims.nelmx3
    }

    pub fn mctype(&self) -> i64 {
        self.dims.mctype
    }

    pub fn nas1(&self) -> &[usize; MAX_SYMMETRIES] {
        &self.dims.nas1
    }

    pub fn nas2(&self) -> &[usize; MAX_SYMMETRIES] {
        &self.dims.nas2
    }

    pub fn nas3(&self) -> &[usize; MAX_SYMMETRIES] {
        &self.dims.nas3
    }

    /// Basis and orbital counts of the symmetries in use.
    pub fn partition(&self) -> &SymmetryPartition {
        &self.dims.partition
    }

    /// MO coefficients, one `nbas x norb` block per symmetry.
    pub fn cmo(&self) -> &MatrixBlock {
        &self.cmo
    }

    /// Reference CI vector.
    pub fn cref(&self) -> &[f64] {
        &self.cref
    }

    /// Active one-electron density, packed, side `nasht`.
    pub fn dv(&self) -> &MatrixBlock {
        &self.dv
    }

    /// Generalized Fock matrix, one `norb x norb` block per symmetry.
    pub fn fock(&self) -> &MatrixBlock {
        &self.fock
    }

    /// Active two-electron density, `nnashx x nnashx`; empty without active orbitals.
    pub fn pv(&self) -> &MatrixBlock {
        &self.pv
    }

    /// Inactive Fock matrix, packed per symmetry.
    pub fn fc(&self) -> &MatrixBlock {
        &self.fc
    }

    /// Active Fock matrix, packed per symmetry.
    pub fn fv(&self) -> &MatrixBlock {
        &self.fv
    }
}

/// Collects decoded groups while the schema is walked.
#[derive(Default)]
struct Builder {
    energies: Option<Energies>,
    dims: Option<Dimensions>,
    cmo: Option<MatrixBlock>,
    cref: Option<Vec<f64>>,
    dv: Option<MatrixBlock>,
    fock: Option<MatrixBlock>,
    pv: Option<MatrixBlock>,
    fc: Option<MatrixBlock>,
    fv: Option<MatrixBlock>,
}

impl Builder {
    fn decode(&mut self, group: Group, bytes: &[u8], config: ReaderConfig) -> Result<()> {
        match group {
            Group::Energies => {
                let fields = schema::decode_fields(bytes, ENERGY_FIELDS, config.integer_width, "energies")?;
                self.energies = Some(Energies::from_fields(&fields)?);
            }
            Group::Dimensions => {
                let fields =
                    schema::decode_fields(bytes, DIMENSION_FIELDS, config.integer_width, "dimensions")?;
                self.dims = Some(Dimensions::from_fields(&fields)?);
            }
            Group::Array(array) => {
                let dims = self.dims.as_ref().ok_or_else(|| {
                    DaltonError::Decode(format!("{} record precedes the dimensions record", array.name()))
                })?;
                let values = utils::decode_f64_array(bytes, array.element_count(dims)?, array.name())?;
                let partition = &dims.partition;
                match array {
                    ArrayGroup::Cmo => {
                        self.cmo = Some(MatrixBlock::from_column_major(
                            values,
                            partition.nbas(),
                            partition.norb(),
                        )?)
                    }
                    ArrayGroup::Cref => self.cref = Some(values),
                    ArrayGroup::Dv => {
                        self.dv = Some(MatrixBlock::single(values, dims.nasht, dims.nasht, Storage::Triangular)?)
                    }
                    ArrayGroup::Fock => {
                        self.fock = Some(MatrixBlock::from_column_major(
                            values,
                            partition.norb(),
                            partition.norb(),
                        )?)
                    }
                    ArrayGroup::Pv => {
                        self.pv = Some(MatrixBlock::single_column_major(values, dims.nnashx, dims.nnashx)?)
                    }
                    ArrayGroup::Fc => {
                        self.fc = Some(MatrixBlock::from_flat(values, partition.norb(), Storage::Triangular)?)
                    }
                    ArrayGroup::Fv => {
                        self.fv = Some(MatrixBlock::from_flat(values, partition.norb(), Storage::Triangular)?)
                    }
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<InterfaceFile> {
        fn take<T>(value: Option<T>, name: &str) -> Result<T> {
            value.ok_or_else(|| DaltonError::MissingRecord(name.to_string()))
        }
        Ok(InterfaceFile {
            energies: take(self.energies, "energies")?,
            dims: take(self.dims, "dimensions")?,
            cmo: take(self.cmo, "CMO")?,
            cref: take(self.cref, "CREF")?,
            dv: take(self.dv, "DV")?,
            fock: take(self.fock, "FOCK")?,
            pv: take(self.pv, "PV")?,
            fc: take(self.fc, "FC")?,
            fv: take(self.fv, "FV")?,
        })
    }
}
