use super::params::{get_opt_float_param, get_pos_int_param, ParamError};
use crate::host::HostDict;
use derive_builder::Builder;
use itertools::Itertools;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const MAX_ITERS_DEFAULT: usize = 2500;
pub const VERBOSE_DEFAULT: usize = 1;
pub const NORMALIZE_DEFAULT: usize = 1;
pub const SCALE_DEFAULT: f64 = 5.;
pub const EPS_DEFAULT: f64 = 1e-3;
pub const CG_RATE_DEFAULT: f64 = 2.;
pub const ALPHA_DEFAULT: f64 = 1.8;
pub const RHO_X_DEFAULT: f64 = 1e-3;

/// Option keys recognized in the `opts` mapping, in parse order.
pub const OPTION_KEYS: [&str; 8] = [
    "MAX_ITERS",
    "VERBOSE",
    "NORMALIZE",
    "SCALE",
    "EPS",
    "CG_RATE",
    "ALPHA",
    "RHO_X",
];

/// Settings handed to the native solver.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverOptions {
    ///maximum number of iterations
    #[builder(default = "MAX_ITERS_DEFAULT")]
    pub max_iters: usize,

    ///verbosity level (0 is silent)
    #[builder(default = "VERBOSE_DEFAULT")]
    pub verbose: usize,

    ///heuristic data rescaling (0 disables)
    #[builder(default = "NORMALIZE_DEFAULT")]
    pub normalize: usize,

    ///rescaling factor applied when normalizing
    #[builder(default = "SCALE_DEFAULT")]
    pub scale: f64,

    ///convergence tolerance
    #[builder(default = "EPS_DEFAULT")]
    pub eps: f64,

    ///rate at which iterative linear solver tolerances tighten
    #[builder(default = "CG_RATE_DEFAULT")]
    pub cg_rate: f64,

    ///relaxation parameter
    #[builder(default = "ALPHA_DEFAULT")]
    pub alpha: f64,

    ///x equality constraint scaling
    #[builder(default = "RHO_X_DEFAULT")]
    pub rho_x: f64,

    ///start from the supplied initial guess.  Set by the warm-start
    ///loader, never read from the option mapping.
    #[builder(default = "false")]
    pub warm_start: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iters: MAX_ITERS_DEFAULT,
            verbose: VERBOSE_DEFAULT,
            normalize: NORMALIZE_DEFAULT,
            scale: SCALE_DEFAULT,
            eps: EPS_DEFAULT,
            cg_rate: CG_RATE_DEFAULT,
            alpha: ALPHA_DEFAULT,
            rho_x: RHO_X_DEFAULT,
            warm_start: false,
        }
    }
}

#[derive(Error, Debug)]
/// Error type returned by options validation
pub enum OptionsError {
    /// A float option that is negative or NaN
    #[error("Bad value for field {0}")]
    BadFieldValue(&'static str),
}

impl From<OptionsError> for SolverOptionsBuilderError {
    fn from(e: OptionsError) -> Self {
        SolverOptionsBuilderError::ValidationError(e.to_string())
    }
}

impl SolverOptionsBuilder {
    /// check that float options are nonnegative
    pub fn validate(&self) -> Result<(), OptionsError> {
        let fields = [
            ("scale", self.scale),
            ("eps", self.eps),
            ("cg_rate", self.cg_rate),
            ("alpha", self.alpha),
            ("rho_x", self.rho_x),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                if !(v >= 0.) {
                    return Err(OptionsError::BadFieldValue(name));
                }
            }
        }
        Ok(())
    }
}

/// Parse the `opts` mapping.
///
/// Missing keys take their defaults and unrecognized keys are ignored.
/// The first field that fails to parse aborts the whole parse.
pub fn parse_opts(mapping: Option<&HostDict>) -> Result<SolverOptions, ParamError> {
    let opts = SolverOptions {
        max_iters: get_pos_int_param("MAX_ITERS", MAX_ITERS_DEFAULT, mapping)?,
        verbose: get_pos_int_param("VERBOSE", VERBOSE_DEFAULT, mapping)?,
        normalize: get_pos_int_param("NORMALIZE", NORMALIZE_DEFAULT, mapping)?,
        scale: get_opt_float_param("SCALE", SCALE_DEFAULT, mapping)?,
        eps: get_opt_float_param("EPS", EPS_DEFAULT, mapping)?,
        cg_rate: get_opt_float_param("CG_RATE", CG_RATE_DEFAULT, mapping)?,
        alpha: get_opt_float_param("ALPHA", ALPHA_DEFAULT, mapping)?,
        rho_x: get_opt_float_param("RHO_X", RHO_X_DEFAULT, mapping)?,
        warm_start: false,
    };

    if let Some(mapping) = mapping {
        let ignored = mapping
            .keys()
            .filter(|k| !OPTION_KEYS.contains(k))
            .join(", ");
        if !ignored.is_empty() {
            log::debug!("ignoring unrecognized options: {}", ignored);
        }
    }

    Ok(opts)
}

#[test]
fn test_parse_opts_defaults() {
    let opts = parse_opts(None).unwrap();
    assert_eq!(opts, SolverOptions::default());
    assert_eq!(opts.max_iters, 2500);
    assert_eq!(opts.alpha, 1.8);

    // builder and Default agree
    assert_eq!(SolverOptionsBuilder::default().build().unwrap(), opts);

    // an empty mapping and unrecognized keys also give defaults
    let mapping = HostDict::new().with("NOT_AN_OPTION", -1);
    assert_eq!(parse_opts(Some(&mapping)).unwrap(), opts);
}

#[test]
fn test_parse_opts_values() {
    let mapping = HostDict::new()
        .with("MAX_ITERS", 10)
        .with("VERBOSE", false)
        .with("EPS", 1e-5)
        .with("ALPHA", 1);
    let opts = parse_opts(Some(&mapping)).unwrap();
    assert_eq!(opts.max_iters, 10);
    assert_eq!(opts.verbose, 0);
    assert_eq!(opts.eps, 1e-5);
    assert_eq!(opts.alpha, 1.);
    assert_eq!(opts.normalize, NORMALIZE_DEFAULT);
    assert_eq!(opts.rho_x, RHO_X_DEFAULT);
}

#[test]
fn test_parse_opts_first_error() {
    // both fields are bad; MAX_ITERS is parsed first
    let mapping = HostDict::new().with("RHO_X", -1.).with("MAX_ITERS", 1.5);
    let err = parse_opts(Some(&mapping)).unwrap_err();
    assert_eq!(err.key, "MAX_ITERS");
}

#[test]
fn test_builder_validate() {
    assert!(SolverOptionsBuilder::default().alpha(-1.).build().is_err());
    assert!(SolverOptionsBuilder::default().eps(f64::NAN).build().is_err());
    let opts = SolverOptionsBuilder::default()
        .max_iters(10usize)
        .scale(0.)
        .build()
        .unwrap();
    assert_eq!(opts.max_iters, 10);
    assert_eq!(opts.scale, 0.);
}
