/// Cells sampled per column when inferring its type.
pub const TYPE_DETECTION_ROWS: usize = 100;

/// How a sheet column is stored in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}
