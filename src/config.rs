use std::path::PathBuf;

/// Where to read, where to write, and the fixed year stamped on contact dates.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source CSV with a header row.
    pub input_path: PathBuf,
    /// Directory receiving `client.csv`, `campaign.csv` and `economics.csv`.
    pub output_dir: PathBuf,
    /// Year combined with `month` and `day` into `last_contact_date`.
    pub contact_year: i32,
    /// Rows per Arrow batch while reading; batches are concatenated afterwards.
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("bank_marketing.csv"),
            output_dir: PathBuf::from("."),
            contact_year: 2022,
            batch_size: 8_192,
        }
    }
}

impl Config {
    pub fn with_input(mut self, input_path: impl Into<PathBuf>) -> Self {
        self.input_path = input_path.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}
