use crate::data_type::DataType;

#[derive(Debug, Clone)]
pub struct Options {
    /// Initial number of node slots reserved by the arena.
    pub capacity: usize,
    /// Data type given to every node until a builder overrides it.
    pub default_data_type: DataType,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            capacity: 256,
            default_data_type: DataType::F32,
        }
    }
}
