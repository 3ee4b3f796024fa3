use serde::{Deserialize, Serialize};

/// Encoding used when exporting the canvas contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }

    /// Prefix every data URL of this format starts with
    pub fn data_url_prefix(self) -> String {
        format!("data:{};base64,", self.mime())
    }
}

/// Encoder quality in `[0, 1]`; anything missing or out of range is coerced.
pub fn export_quality(quality: Option<f64>) -> f64 {
    match quality {
        Some(q) if q.is_nan() => 1.0,
        Some(q) => q.clamp(0.0, 1.0),
        None => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_types() {
        assert_eq!(ExportFormat::Png.mime(), "image/png");
        assert_eq!(ExportFormat::Jpeg.mime(), "image/jpeg");
        assert_eq!(ExportFormat::Jpeg.data_url_prefix(), "data:image/jpeg;base64,");
    }

    #[test]
    fn quality_defaults_to_one_and_clamps() {
        assert_eq!(export_quality(None), 1.0);
        assert_eq!(export_quality(Some(0.4)), 0.4);
        assert_eq!(export_quality(Some(100.0)), 1.0);
        assert_eq!(export_quality(Some(-2.0)), 0.0);
        assert_eq!(export_quality(Some(f64::NAN)), 1.0);
    }
}
