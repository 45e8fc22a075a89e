//! Model variants and the user-facing alternative selector.
//!
//! A [`ModelVariant`] decides which cross-impact pairs `(ψ, γ)` are
//! estimated and which stay fixed at zero:
//!
//! | variant  | root pair (shoot → root) | shoot pair (root → shoot) | free |
//! |----------|--------------------------|---------------------------|------|
//! | `Null`   | fixed                    | fixed                     | 4    |
//! | `Stor`   | free                     | fixed                     | 6    |
//! | `Rtos`   | fixed                    | free                      | 6    |
//! | `TwoDir` | free                     | free                      | 8    |
//!
//! [`Alternative`] is the subset a caller may test against the null.
use crate::granger::{
    core::params::{GAMMA_ROOT, GAMMA_SHOOT, PSI_ROOT, PSI_SHOOT, THETA_LEN},
    errors::GrangerError,
};
use std::str::FromStr;

/// Which cross-impact pairs a fit estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelVariant {
    Null,
    Rtos,
    Stor,
    TwoDir,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 4] =
        [ModelVariant::Null, ModelVariant::Rtos, ModelVariant::Stor, ModelVariant::TwoDir];

    /// Whether `(ψ_root, γ_root)`, the shoot → root impact, is estimated.
    pub fn frees_root_cross(&self) -> bool {
        matches!(self, ModelVariant::Stor | ModelVariant::TwoDir)
    }

    /// Whether `(ψ_shoot, γ_shoot)`, the root → shoot impact, is estimated.
    pub fn frees_shoot_cross(&self) -> bool {
        matches!(self, ModelVariant::Rtos | ModelVariant::TwoDir)
    }

    /// Whether canonical index `idx` is a free coordinate.
    pub fn is_free(&self, idx: usize) -> bool {
        match idx {
            PSI_ROOT | GAMMA_ROOT => self.frees_root_cross(),
            PSI_SHOOT | GAMMA_SHOOT => self.frees_shoot_cross(),
            _ => idx < THETA_LEN,
        }
    }

    /// Canonical indices of the free coordinates, in θ-space order.
    pub fn free_indices(&self) -> Vec<usize> {
        (0..THETA_LEN).filter(|&idx| self.is_free(idx)).collect()
    }

    pub fn free_count(&self) -> usize {
        4 + 2 * usize::from(self.frees_root_cross()) + 2 * usize::from(self.frees_shoot_cross())
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModelVariant::Null => "null",
            ModelVariant::Rtos => "rtos",
            ModelVariant::Stor => "stor",
            ModelVariant::TwoDir => "twodir",
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Alternative hypothesis tested against the null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alternative {
    /// Both directions of cross-impact.
    #[default]
    TwoDir,
    /// Root drives shoot.
    Rtos,
    /// Shoot drives root.
    Stor,
}

impl Alternative {
    /// The model fitted under this alternative.
    pub fn variant(&self) -> ModelVariant {
        match self {
            Alternative::TwoDir => ModelVariant::TwoDir,
            Alternative::Rtos => ModelVariant::Rtos,
            Alternative::Stor => ModelVariant::Stor,
        }
    }

    /// Degrees of freedom of the likelihood-ratio statistic.
    pub fn df(&self) -> usize {
        self.variant().free_count() - ModelVariant::Null.free_count()
    }
}

impl std::fmt::Display for Alternative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.variant().name())
    }
}

impl FromStr for Alternative {
    type Err = GrangerError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twodir" => Ok(Alternative::TwoDir),
            "rtos" => Ok(Alternative::Rtos),
            "stor" => Ok(Alternative::Stor),
            _ => Err(GrangerError::InvalidAlternative { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Free counts and free indices agree with the variant table.
    //
    // Given
    // -----
    // - All four variants.
    //
    // Expect
    // ------
    // - Counts 4/6/6/8 and fixed indices excluded.
    fn free_counts_follow_table() {
        assert_eq!(ModelVariant::Null.free_indices(), vec![0, 3, 4, 7]);
        assert_eq!(ModelVariant::Stor.free_indices(), vec![0, 1, 2, 3, 4, 7]);
        assert_eq!(ModelVariant::Rtos.free_indices(), vec![0, 3, 4, 5, 6, 7]);
        assert_eq!(ModelVariant::TwoDir.free_indices(), (0..8).collect::<Vec<_>>());
        for v in ModelVariant::ALL {
            assert_eq!(v.free_indices().len(), v.free_count());
        }
    }

    #[test]
    // Purpose
    // -------
    // The selector parses case-insensitively and rejects unknown names.
    //
    // Given
    // -----
    // - "TwoDir", " rtos ", "STOR", "both".
    //
    // Expect
    // ------
    // - Three variants, then `InvalidAlternative` carrying the input.
    fn alternative_parses_and_rejects() {
        assert_eq!("TwoDir".parse::<Alternative>(), Ok(Alternative::TwoDir));
        assert_eq!(" rtos ".parse::<Alternative>(), Ok(Alternative::Rtos));
        assert_eq!("STOR".parse::<Alternative>(), Ok(Alternative::Stor));
        assert_eq!(
            "both".parse::<Alternative>(),
            Err(GrangerError::InvalidAlternative { name: "both".to_string() })
        );
        assert_eq!(Alternative::default(), Alternative::TwoDir);
    }

    #[test]
    // Purpose
    // -------
    // Degrees of freedom are the extra free parameters of the alternative.
    //
    // Given
    // -----
    // - Each alternative.
    //
    // Expect
    // ------
    // - 4 for two directions, 2 for one direction.
    fn df_counts_extra_parameters() {
        assert_eq!(Alternative::TwoDir.df(), 4);
        assert_eq!(Alternative::Rtos.df(), 2);
        assert_eq!(Alternative::Stor.df(), 2);
        assert_eq!(Alternative::Stor.to_string(), "stor");
    }
}
