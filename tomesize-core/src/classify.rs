// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::allocate::{CapacityBand, VolumeDescriptor};
use crate::error::{Result, TomeError};

/// Book format ordered for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeCode {
    S,
    M,
    L,
    Ls,
    Lm,
    Ll,
    Custom,
}

impl SizeCode {
    pub fn as_str(self) -> &'static str {
        match self {
            SizeCode::S => "s",
            SizeCode::M => "m",
            SizeCode::L => "l",
            SizeCode::Ls => "ls",
            SizeCode::Lm => "lm",
            SizeCode::Ll => "ll",
            SizeCode::Custom => "custom",
        }
    }
}

impl fmt::Display for SizeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map allocated volumes to a size code.
///
/// A single volume is classified by its own total, two volumes by the second
/// one's total; three or more are always `custom`.
pub fn classify(volumes: &[VolumeDescriptor]) -> Result<SizeCode> {
    let (inspected, codes) = match volumes {
        [single] => (single, [SizeCode::S, SizeCode::M, SizeCode::L]),
        [_, second] => (second, [SizeCode::Ls, SizeCode::Lm, SizeCode::Ll]),
        [] => {
            return Err(TomeError::Unclassifiable {
                volumes: 0,
                total: 0,
            })
        }
        _ => return Ok(SizeCode::Custom),
    };

    match CapacityBand::fitting(inspected.total) {
        Some(CapacityBand::Small) => Ok(codes[0]),
        Some(CapacityBand::Medium) => Ok(codes[1]),
        Some(CapacityBand::Large) => Ok(codes[2]),
        None => Err(TomeError::Unclassifiable {
            volumes: volumes.len(),
            total: inspected.total,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_total(total: u32) -> VolumeDescriptor {
        VolumeDescriptor {
            total,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_volume_codes() {
        assert_eq!(classify(&[with_total(54)]).unwrap(), SizeCode::S);
        assert_eq!(classify(&[with_total(55)]).unwrap(), SizeCode::M);
        assert_eq!(classify(&[with_total(94)]).unwrap(), SizeCode::M);
        assert_eq!(classify(&[with_total(188)]).unwrap(), SizeCode::L);
    }

    #[test]
    fn test_two_volumes_use_second_total() {
        let first = with_total(188);
        assert_eq!(classify(&[first, with_total(54)]).unwrap(), SizeCode::Ls);
        assert_eq!(classify(&[first, with_total(94)]).unwrap(), SizeCode::Lm);
        assert_eq!(classify(&[first, with_total(188)]).unwrap(), SizeCode::Ll);
        // the first volume's total is not inspected
        assert_eq!(classify(&[with_total(10), with_total(54)]).unwrap(), SizeCode::Ls);
    }

    #[test]
    fn test_three_or_more_volumes_are_custom() {
        let volumes = vec![with_total(188); 3];
        assert_eq!(classify(&volumes).unwrap(), SizeCode::Custom);
        let volumes = vec![with_total(188); 5];
        assert_eq!(classify(&volumes).unwrap(), SizeCode::Custom);
    }

    #[test]
    fn test_oversized_totals_are_unclassifiable() {
        let err = classify(&[with_total(189)]).unwrap_err();
        assert!(matches!(
            err,
            TomeError::Unclassifiable {
                volumes: 1,
                total: 189
            }
        ));
        assert!(classify(&[with_total(1), with_total(200)]).is_err());
        assert!(classify(&[]).is_err());
    }

    #[test]
    fn test_size_code_tokens() {
        assert_eq!(SizeCode::Custom.to_string(), "custom");
        assert_eq!(serde_json::to_string(&SizeCode::Ls).unwrap(), "\"ls\"");
        let code: SizeCode = serde_json::from_str("\"lm\"").unwrap();
        assert_eq!(code, SizeCode::Lm);
    }
}
