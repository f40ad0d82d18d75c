use nalgebra::Point3;
use phf::{Map, phf_map};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AminoAcid {
    // --- Aliphatic, Nonpolar ---
    Alanine,    // Alanine (ALA, A)
    Glycine,    // Glycine (GLY, G)
    Isoleucine, // Isoleucine (ILE, I)
    Leucine,    // Leucine (LEU, L)
    Proline,    // Proline (PRO, P)
    Valine,     // Valine (VAL, V)

    // --- Aromatic ---
    Phenylalanine, // Phenylalanine (PHE, F)
    Tryptophan,    // Tryptophan (TRP, W)
    Tyrosine,      // Tyrosine (TYR, Y)

    // --- Polar, Uncharged ---
    Asparagine, // Asparagine (ASN, N)
    Cysteine,   // Cysteine (CYS, C)
    Glutamine,  // Glutamine (GLN, Q)
    Serine,     // Serine (SER, S)
    Threonine,  // Threonine (THR, T)
    Methionine, // Methionine (MET, M)

    // --- Charged ---
    Arginine,     // Arginine (ARG, R)
    Histidine,    // Histidine (HIS, H)
    Lysine,       // Lysine (LYS, K)
    AsparticAcid, // Aspartic Acid (ASP, D)
    GlutamicAcid, // Glutamic Acid (GLU, E)

    // Non-standard or unresolved residue (X)
    Unknown,
}

static THREE_LETTER_CODES: Map<&'static str, AminoAcid> = phf_map! {
    "ALA" => AminoAcid::Alanine,
    "GLY" => AminoAcid::Glycine,
    "ILE" => AminoAcid::Isoleucine,
    "LEU" => AminoAcid::Leucine,
    "PRO" => AminoAcid::Proline,
    "VAL" => AminoAcid::Valine,
    "PHE" => AminoAcid::Phenylalanine,
    "TRP" => AminoAcid::Tryptophan,
    "TYR" => AminoAcid::Tyrosine,
    "ASN" => AminoAcid::Asparagine,
    "CYS" => AminoAcid::Cysteine,
    "GLN" => AminoAcid::Glutamine,
    "SER" => AminoAcid::Serine,
    "THR" => AminoAcid::Threonine,
    "MET" => AminoAcid::Methionine,
    "ARG" => AminoAcid::Arginine,
    "HIS" => AminoAcid::Histidine,
    "LYS" => AminoAcid::Lysine,
    "ASP" => AminoAcid::AsparticAcid,
    "GLU" => AminoAcid::GlutamicAcid,
};

impl AminoAcid {
    /// Maps a three-letter residue name (any case) to its amino acid.
    ///
    /// Names outside the twenty standard residues map to [`AminoAcid::Unknown`].
    pub fn from_three_letter(name: &str) -> Self {
        THREE_LETTER_CODES
            .get(name.trim().to_ascii_uppercase().as_str())
            .copied()
            .unwrap_or(AminoAcid::Unknown)
    }

    pub fn from_one_letter(code: char) -> Self {
        match code.to_ascii_uppercase() {
            'A' => AminoAcid::Alanine,
            'G' => AminoAcid::Glycine,
            'I' => AminoAcid::Isoleucine,
            'L' => AminoAcid::Leucine,
            'P' => AminoAcid::Proline,
            'V' => AminoAcid::Valine,
            'F' => AminoAcid::Phenylalanine,
            'W' => AminoAcid::Tryptophan,
            'Y' => AminoAcid::Tyrosine,
            'N' => AminoAcid::Asparagine,
            'C' => AminoAcid::Cysteine,
            'Q' => AminoAcid::Glutamine,
            'S' => AminoAcid::Serine,
            'T' => AminoAcid::Threonine,
            'M' => AminoAcid::Methionine,
            'R' => AminoAcid::Arginine,
            'H' => AminoAcid::Histidine,
            'K' => AminoAcid::Lysine,
            'D' => AminoAcid::AsparticAcid,
            'E' => AminoAcid::GlutamicAcid,
            _ => AminoAcid::Unknown,
        }
    }

    pub fn one_letter(&self) -> char {
        match self {
            AminoAcid::Alanine => 'A',
            AminoAcid::Glycine => 'G',
            AminoAcid::Isoleucine => 'I',
            AminoAcid::Leucine => 'L',
            AminoAcid::Proline => 'P',
            AminoAcid::Valine => 'V',
            AminoAcid::Phenylalanine => 'F',
            AminoAcid::Tryptophan => 'W',
            AminoAcid::Tyrosine => 'Y',
            AminoAcid::Asparagine => 'N',
            AminoAcid::Cysteine => 'C',
            AminoAcid::Glutamine => 'Q',
            AminoAcid::Serine => 'S',
            AminoAcid::Threonine => 'T',
            AminoAcid::Methionine => 'M',
            AminoAcid::Arginine => 'R',
            AminoAcid::Histidine => 'H',
            AminoAcid::Lysine => 'K',
            AminoAcid::AsparticAcid => 'D',
            AminoAcid::GlutamicAcid => 'E',
            AminoAcid::Unknown => 'X',
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.one_letter())
    }
}

/// A single residue position of a chain, reduced to its C-alpha atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub index: isize,              // Position in the canonical sequence
    pub amino_acid: AminoAcid,     // Residue identity
    pub coordinate: Point3<f64>,   // C-alpha position; all-NaN when unresolved
    pub quality: f64,              // Model confidence or crystallographic B-factor
}

impl Residue {
    pub fn new(index: isize, amino_acid: AminoAcid, coordinate: Point3<f64>, quality: f64) -> Self {
        Self {
            index,
            amino_acid,
            coordinate,
            quality,
        }
    }

    /// A residue present in the sequence but absent from the coordinates.
    pub fn missing(index: isize, amino_acid: AminoAcid) -> Self {
        Self {
            index,
            amino_acid,
            coordinate: Point3::new(f64::NAN, f64::NAN, f64::NAN),
            quality: f64::NAN,
        }
    }

    pub fn has_coordinate(&self) -> bool {
        self.coordinate.iter().all(|c| c.is_finite())
    }
}
