use clap::ValueEnum;

const MISSING: &str = "--";

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Formats a temperature stored in Celsius.
    pub fn format_temp(self, temp_c: Option<f64>) -> String {
        match (temp_c, self) {
            (None, _) => MISSING.to_string(),
            (Some(t), Units::Metric) => format!("{t:.1} C"),
            (Some(t), Units::Imperial) => format!("{:.1} F", temperature::c2f(t)),
        }
    }
}

pub mod temperature {
    pub fn c2f(temp_c: f64) -> f64 {
        temp_c * 9.0 / 5.0 + 32.0
    }

    #[test]
    fn test_temperature() {
        assert_eq!(c2f(0.0), 32.0);
        assert_eq!(c2f(100.0), 212.0);
        assert_eq!(c2f(-40.0), -40.0);
    }
}

#[test]
fn test_format_temp() {
    assert_eq!(Units::Metric.format_temp(Some(25.0)), "25.0 C");
    assert_eq!(Units::Imperial.format_temp(Some(25.0)), "77.0 F");
    assert_eq!(Units::Imperial.format_temp(None), "--");
}
