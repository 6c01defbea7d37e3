//! Canonical text report of an interface file.
//!
//! Scalars first, then the symmetry table and per-symmetry arrays, then each
//! matrix in its rendered form. Snapshot comparisons rely on this exact layout.

use std::fmt;

use super::InterfaceFile;
use crate::dalton::matrix::MatrixBlock;

fn write_float(f: &mut fmt::Formatter, name: &str, value: f64) -> fmt::Result {
    writeln!(f, "{:<24}: {:12.6}", name, value)
}

fn write_scalar(f: &mut fmt::Formatter, name: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "{:<24}: {}", name, value)
}

fn write_array(f: &mut fmt::Formatter, name: &str, values: &[usize]) -> fmt::Result {
    writeln!(f, "{}: {}", name, join(values))
}

fn write_matrix(f: &mut fmt::Formatter, name: &str, matrix: &MatrixBlock) -> fmt::Result {
    writeln!(f, "{}\n{}", name, matrix)
}

fn join(values: &[usize]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for InterfaceFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_float(f, "Nuclear Potential Energy", self.potnuc())?;
        write_float(f, "Electronic energy", self.emy())?;
        write_float(f, "Active energy", self.eactive())?;
        write_float(f, "MCSCF energy", self.emcscf())?;
        write_scalar(f, "State", self.istate())?;
        write_scalar(f, "Spin", self.ispin())?;
        write_scalar(f, "Active electrons", self.nactel())?;
        write_scalar(f, "Symmetry", self.lsym())?;

        let d = &self.dims;
        let counts = [
            ("NISHT", d.nisht),
            ("NASHT", d.nasht),
            ("NOCCT", d.nocct),
            ("NORBT", d.norbt),
            ("NBAST", d.nbast),
            ("NCONF", d.nconf),
            ("NWOPT", d.nwopt),
            ("NWOPH", d.nwoph),
            ("NCDETS", d.ncdets),
            ("NCMOT", d.ncmot),
            ("NNASHX", d.nnashx),
            ("NNASHY", d.nnashy),
            ("NNORBT", d.nnorbt),
            ("N2ORBT", d.n2orbt),
            ("NSYM", d.nsym),
        ];
        for (name, value) in counts {
            write_scalar(f, name, value)?;
        }

        writeln!(f, "MULD2H:")?;
        for row in &d.muld2h {
            writeln!(f, "    {}", join(row))?;
        }

        for (name, values) in [
            ("NRHF", &d.nrhf),
            ("NFRO", &d.nfro),
            ("NISH", &d.nish),
            ("NASH", &d.nash),
            ("NORB", &d.norb),
            ("NBAS", &d.nbas),
        ] {
            write_array(f, name, values)?;
        }

        for (name, value) in [
            ("NELMN1", d.nelmn1),
            ("NELMX1", d.nelmx1),
            ("NELMN3", d.nelmn3),
            ("NELMX3", d.nelmx3),
            ("MCTYPE", d.mctype),
        ] {
            write_scalar(f, name, value)?;
        }

        for (name, values) in [("NAS1", &d.nas1), ("NAS2", &d.nas2), ("NAS3", &d.nas3)] {
            write_array(f, name, values)?;
        }

        write_matrix(f, "CMO", &self.cmo)?;
        write_matrix(f, "DV", &self.dv)?;
        write_matrix(f, "FOCK", &self.fock)?;
        write_matrix(f, "PV", &self.pv)?;
        write_matrix(f, "FC", &self.fc)?;
        write_matrix(f, "FV", &self.fv)
    }
}
