use crate::error::Result;
use crate::printer::options::KNOWN_OPTIONS;
use crate::printer::{PrinterBackend, PrinterDescriptor};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PrinterListing {
    pub system: &'static str,
    pub printers: Vec<PrinterDescriptor>,
    pub default_printer: Option<String>,
}

/// Query the backend afresh; nothing here is cached between runs.
pub fn list(backend: &dyn PrinterBackend) -> Result<PrinterListing> {
    let printers = backend.list_printers()?;
    let default_printer = backend.default_printer()?;
    Ok(PrinterListing {
        system: backend.system_name(),
        printers,
        default_printer,
    })
}

pub fn print_listing(listing: &PrinterListing) {
    println!("System: {}", listing.system);

    if listing.printers.is_empty() {
        println!("No printers found.");
    } else {
        println!();
        println!("Available printers ({}):", listing.printers.len());
        for (i, printer) in listing.printers.iter().enumerate() {
            let marker = if printer.is_default { " (default)" } else { "" };
            println!("  {}. {} [{}]{}", i + 1, printer.name, printer.status, marker);
        }
        if let Some(default) = &listing.default_printer {
            println!();
            println!("Default printer: {}", default);
        }
    }

    println!();
    println!("Print options (use with --print-options):");
    for (option, description) in KNOWN_OPTIONS {
        println!("  {}: {}", option, description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::mock::MockBackend;

    #[test]
    fn test_list_with_default() {
        let backend = MockBackend::with_printers(&["Office", "Lab"], Some("Lab"));
        let listing = list(&backend).unwrap();
        assert_eq!(listing.system, "Mock");
        assert_eq!(listing.printers.len(), 2);
        assert_eq!(listing.default_printer.as_deref(), Some("Lab"));
    }

    #[test]
    fn test_list_empty_is_not_an_error() {
        let listing = list(&MockBackend::default()).unwrap();
        assert!(listing.printers.is_empty());
        assert_eq!(listing.default_printer, None);
    }

    #[test]
    fn test_listing_json_shape() {
        let backend = MockBackend::with_printers(&["Office"], Some("Office"));
        let json = serde_json::to_value(list(&backend).unwrap()).unwrap();
        assert_eq!(json["printers"][0]["name"], "Office");
        assert_eq!(json["printers"][0]["is_default"], true);
        assert_eq!(json["default_printer"], "Office");
    }
}
