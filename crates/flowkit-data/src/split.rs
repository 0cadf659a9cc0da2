// Split / Pass - named dataset subsets
//
// Strings are parsed against a fixed vocabulary; each dataset then narrows
// the vocabulary further in its builder (Sintel and KITTI take train/test,
// FlyingChairs takes train/val).

use std::fmt;
use std::str::FromStr;

use crate::error::{DataResult, DatasetError};

/// Which subset of a benchmark to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Split {
    #[default]
    Train,
    Val,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }

    /// Fail with `Config` unless `self` is one of `allowed`.
    pub(crate) fn ensure_in(self, allowed: &[Split]) -> DataResult<Self> {
        if allowed.contains(&self) {
            Ok(self)
        } else {
            Err(DatasetError::Config {
                arg: "split",
                value: self.as_str().to_string(),
                allowed: allowed.iter().map(Split::as_str).collect(),
            })
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "val" => Ok(Split::Val),
            "test" => Ok(Split::Test),
            _ => Err(DatasetError::Config {
                arg: "split",
                value: s.to_string(),
                allowed: vec!["train", "val", "test"],
            }),
        }
    }
}

/// Sintel rendering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pass {
    #[default]
    Clean,
    Final,
}

impl Pass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pass::Clean => "clean",
            Pass::Final => "final",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pass {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clean" => Ok(Pass::Clean),
            "final" => Ok(Pass::Final),
            _ => Err(DatasetError::Config {
                arg: "pass_name",
                value: s.to_string(),
                allowed: vec!["clean", "final"],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip_names() {
        for s in ["train", "val", "test"] {
            assert_eq!(s.parse::<Split>().unwrap().to_string(), s);
        }
        for s in ["clean", "final"] {
            assert_eq!(s.parse::<Pass>().unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_unknown_split_is_config_error() {
        let err = "training".parse::<Split>().unwrap_err();
        assert!(matches!(err, DatasetError::Config { arg: "split", .. }));
        let err = "albedo".parse::<Pass>().unwrap_err();
        assert!(matches!(err, DatasetError::Config { arg: "pass_name", .. }));
    }

    #[test]
    fn test_ensure_in() {
        assert!(Split::Train.ensure_in(&[Split::Train, Split::Test]).is_ok());
        let err = Split::Val
            .ensure_in(&[Split::Train, Split::Test])
            .unwrap_err();
        match err {
            DatasetError::Config { value, allowed, .. } => {
                assert_eq!(value, "val");
                assert_eq!(allowed, vec!["train", "test"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
