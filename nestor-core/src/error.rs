//! Error types for the Nestor core library.
//!
//! Defines the top-level error enum exposed by the pipeline, the macro used by
//! every module to attach stable machine-readable codes, and a convenient
//! result alias.

use std::{fmt, io, path::PathBuf, sync::Arc};

use thiserror::Error;

use crate::{
    cluster::{ClusterProducerError, ClusterProducerErrorCode},
    hierarchy::{AssemblyError, HierarchyError},
    network::NetworkFormatError,
};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl ::std::fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

pub(crate) use define_error_codes;

/// Error type produced when configuring or running [`crate::Nestor`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NestorError {
    /// A ratio threshold was outside `[0, 1]` or not finite.
    #[error("{name} must be a finite value in [0, 1] (got {value})")]
    InvalidThreshold {
        /// Name of the offending threshold.
        name: &'static str,
        /// Value supplied by the caller.
        value: f64,
    },
    /// The input network could not be decoded.
    #[error(transparent)]
    Network {
        /// Underlying format error.
        #[from]
        source: NetworkFormatError,
    },
    /// Raw clusters could not be placed in a containment hierarchy.
    #[error(transparent)]
    Assembly {
        /// Underlying assembly error.
        #[from]
        source: AssemblyError,
    },
    /// The refined hierarchy broke a structural invariant.
    #[error(transparent)]
    Hierarchy {
        /// Underlying hierarchy error.
        #[from]
        source: HierarchyError,
    },
    /// The external [`crate::ClusterProducer`] failed.
    #[error("cluster producer `{producer}` failed: {error}")]
    Clustering {
        /// Name reported by the producer.
        producer: Arc<str>,
        /// Error surfaced by the producer.
        #[source]
        error: ClusterProducerError,
    },
    /// Reading or writing scratch storage failed.
    #[error("i/o failure on `{}`: {source}", path.display())]
    Io {
        /// File that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`NestorError`] variants.
    enum NestorErrorCode for NestorError {
        /// A ratio threshold was outside `[0, 1]` or not finite.
        InvalidThreshold => InvalidThreshold { .. } => "NESTOR_INVALID_THRESHOLD",
        /// The input network could not be decoded.
        InputFormat => Network { .. } => "NESTOR_INPUT_FORMAT",
        /// Raw clusters could not be placed in a containment hierarchy.
        Assembly => Assembly { .. } => "NESTOR_ASSEMBLY",
        /// The refined hierarchy broke a structural invariant.
        Hierarchy => Hierarchy { .. } => "NESTOR_HIERARCHY_INVARIANT",
        /// The external cluster producer failed.
        Clustering => Clustering { .. } => "NESTOR_CLUSTERING",
        /// Reading or writing scratch storage failed.
        Io => Io { .. } => "NESTOR_IO",
    }
}

impl NestorError {
    /// Retrieve the inner [`ClusterProducerErrorCode`] when the error
    /// originated in a [`crate::ClusterProducer`].
    #[must_use]
    pub const fn producer_code(&self) -> Option<ClusterProducerErrorCode> {
        match self {
            Self::Clustering { error, .. } => Some(error.code()),
            _ => None,
        }
    }

    /// Returns a short label naming the stage that failed, for log fields.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::InvalidThreshold { .. } => Stage::Configuration,
            Self::Network { .. } => Stage::Input,
            Self::Io { .. } => Stage::EdgeExtraction,
            Self::Clustering { .. } => Stage::Clustering,
            Self::Assembly { .. } => Stage::Assembly,
            Self::Hierarchy { .. } => Stage::Refinement,
        }
    }
}

/// Pipeline stage associated with a [`NestorError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    /// Builder validation.
    Configuration,
    /// Loading the input network.
    Input,
    /// Writing the edge list to scratch storage.
    EdgeExtraction,
    /// Running the external cluster producer.
    Clustering,
    /// Assembling raw clusters into a hierarchy.
    Assembly,
    /// Refining the assembled hierarchy.
    Refinement,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Input => "input",
            Self::EdgeExtraction => "edge_extraction",
            Self::Clustering => "clustering",
            Self::Assembly => "assembly",
            Self::Refinement => "refinement",
        };
        f.write_str(label)
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, NestorError>;
