use serde::Deserialize;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;

// The request file has the following structure (only "quantity" is required):
// {
//    "quantity": 12,
//    "code_digits": 4,
//    "expiry_date": "2026-12-31",
//    "seed": 42,
//    "output_dir": "strips"
// }
#[derive(Debug, Deserialize)]
pub struct StripRequest {
    pub quantity: u32,
    #[serde(default = "default_code_digits")]
    pub code_digits: u32,
    pub expiry_date: Option<String>,
    pub seed: Option<u64>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_code_digits() -> u32 {
    4
}

fn default_output_dir() -> String {
    "strips".to_string()
}

pub fn read_strip_request(path: &str) -> Result<StripRequest, Box<dyn Error>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let request: StripRequest = serde_json::from_reader(reader)?;
    Ok(request)
}

// Turns an ISO "YYYY-MM-DD" date into the printed "DD/MM/YYYY" form.
// Anything that doesn't look like an ISO date passes through untouched;
// this is display formatting, not validation.
pub fn format_expiry(date: &str) -> String {
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [year, month, day] if !year.is_empty() && !month.is_empty() && !day.is_empty() => {
            format!("{day}/{month}/{year}")
        }
        _ => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_strip_request() {
        let path = "test_strip_request.json";
        std::fs::write(
            path,
            r#"{ "quantity": 3, "expiry_date": "2026-12-31", "seed": 7 }"#,
        )
        .expect("write request file");
        let request = read_strip_request(path).expect("should read file");
        std::fs::remove_file(path).ok();

        assert_eq!(request.quantity, 3);
        assert_eq!(request.code_digits, 4, "code_digits should default to 4");
        assert_eq!(request.expiry_date.as_deref(), Some("2026-12-31"));
        assert_eq!(request.seed, Some(7));
        assert_eq!(request.output_dir, "strips");
    }

    #[test]
    fn test_read_strip_request_missing_file() {
        assert!(read_strip_request("no_such_request.json").is_err());
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry("2026-12-31"), "31/12/2026");
        assert_eq!(format_expiry("2027-01-05"), "05/01/2027");
    }

    #[test]
    fn test_format_expiry_passthrough() {
        assert_eq!(format_expiry("31/12/2026"), "31/12/2026");
        assert_eq!(format_expiry(""), "");
        assert_eq!(format_expiry("not a date"), "not a date");
    }
}
