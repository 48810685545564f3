//! PNG filtering for single-row grayscale images.
//!
//! With one row there is no previous scanline: Up degenerates to None and
//! Paeth to Sub, but the filter byte differs and so can the compressed size.

/// PNG filter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FilterType {
    /// Raw bytes.
    None = 0,
    /// Difference from the left neighbor.
    Sub = 1,
    /// Difference from the byte above (zero here).
    Up = 2,
    /// Difference from the mean of left and above.
    Average = 3,
    /// Paeth predictor.
    Paeth = 4,
}

impl FilterType {
    /// All filters, in the order they are tried.
    pub const ALL: [FilterType; 5] = [
        FilterType::None,
        FilterType::Sub,
        FilterType::Up,
        FilterType::Average,
        FilterType::Paeth,
    ];
}

/// Filter a single 8-bit grayscale row, prefixed with its filter byte.
pub fn filter_row(row: &[u8], filter: FilterType) -> Vec<u8> {
    let mut out = Vec::with_capacity(row.len() + 1);
    out.push(filter as u8);
    match filter {
        FilterType::None | FilterType::Up => out.extend_from_slice(row),
        FilterType::Sub | FilterType::Paeth => {
            let mut left = 0u8;
            for &b in row {
                out.push(b.wrapping_sub(left));
                left = b;
            }
        }
        FilterType::Average => {
            let mut left = 0u8;
            for &b in row {
                out.push(b.wrapping_sub(left >> 1));
                left = b;
            }
        }
    }
    out
}

/// Undo [`filter_row`].
pub fn unfilter_row(filtered: &[u8]) -> Option<Vec<u8>> {
    let (&kind, data) = filtered.split_first()?;
    let mut out = Vec::with_capacity(data.len());
    let mut left = 0u8;
    for &b in data {
        let value = match kind {
            0 | 2 => b,
            1 | 4 => b.wrapping_add(left),
            3 => b.wrapping_add(left >> 1),
            _ => return None,
        };
        out.push(value);
        left = value;
    }
    Some(out)
}
