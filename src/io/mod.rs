//! Reading and writing problems and results as JSON.
//!
//! A problem file holds the arguments of a solve with explicit element
//! types (`Ax`, `b` and `c` as floats, `Ai` and `Ap` as integers) and the
//! `cone`, `opts` and `warm` mappings as JSON objects.  Results are
//! written with the same key names as the host-facing result.

use crate::bridge::{cast_scalar, SolveArgs, SolveOutput};
use crate::host::{HostArray, HostDict};
use num_traits::NumCast;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::{self, Read, Write};

/// JSON file input and output.
pub trait JsonReadWrite: Sized {
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error>;
    fn read_from_file(file: &mut File) -> Result<Self, io::Error>;
}

// The serialized form of SolveArgs, with arrays flattened to plain
// vectors of the element type the solve expects.

#[derive(Serialize, Deserialize)]
#[allow(non_snake_case)]
struct JsonSolveArgs {
    shape: (i64, i64),
    Ax: Vec<f64>,
    Ai: Vec<i64>,
    Ap: Vec<i64>,
    b: Vec<f64>,
    c: Vec<f64>,
    cone: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    opts: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warm: Option<serde_json::Map<String, serde_json::Value>>,
}

impl JsonReadWrite for SolveArgs {
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let json_data = JsonSolveArgs {
            shape: self.shape,
            Ax: flatten(&self.ax, "Ax")?,
            Ai: flatten(&self.ai, "Ai")?,
            Ap: flatten(&self.ap, "Ap")?,
            b: flatten(&self.b, "b")?,
            c: flatten(&self.c, "c")?,
            cone: (&self.cone).into(),
            opts: self.opts.as_ref().map(Into::into),
            warm: self.warm.as_ref().map(Into::into),
        };

        let json = serde_json::to_string(&json_data)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let json_data: JsonSolveArgs = serde_json::from_str(&buffer)?;

        let args = SolveArgs {
            shape: json_data.shape,
            ax: HostArray::from_vec(json_data.Ax),
            ai: HostArray::from_vec(json_data.Ai),
            ap: HostArray::from_vec(json_data.Ap),
            b: HostArray::from_vec(json_data.b),
            c: HostArray::from_vec(json_data.c),
            cone: HostDict::from(&json_data.cone),
            opts: json_data.opts.as_ref().map(HostDict::from),
            warm: json_data.warm.as_ref().map(HostDict::from),
        };
        Ok(args)
    }
}

impl JsonReadWrite for SolveOutput {
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let json = serde_json::to_string(self)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let output = serde_json::from_str(&buffer)?;
        Ok(output)
    }
}

fn flatten<T: NumCast>(arr: &HostArray, arg: &str) -> Result<Vec<T>, io::Error> {
    arr.scalars()
        .map(|s| {
            cast_scalar::<T>(s).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} holds a value that cannot be written", arg),
                )
            })
        })
        .collect()
}

// non-finite floats are written as null by serde_json

pub(crate) fn float_or_null<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
}

pub(crate) fn floats_or_null<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
    let v = Vec::<Option<f64>>::deserialize(d)?;
    Ok(v.into_iter().map(|x| x.unwrap_or(f64::NAN)).collect())
}
