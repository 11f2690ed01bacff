//! Business details shown on reports and receipts.

/// The name, contact details and currency of the business running the app.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessConfig {
    /// The business name, e.g. "TZ Scraps".
    pub name: String,
    /// A phone number or other contact line printed on receipts.
    pub contact: String,
    /// The glyph prefixed to currency amounts on screen, e.g. "₦".
    pub currency_symbol: String,
    /// A plain text prefix for currency amounts where the glyph cannot be drawn, e.g. "NGN ".
    pub currency_code: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: "TZ Scraps".to_owned(),
            contact: "+234 123 456 7890".to_owned(),
            currency_symbol: "₦".to_owned(),
            currency_code: "NGN ".to_owned(),
        }
    }
}

impl BusinessConfig {
    /// The file name stem for an exported report, e.g. "TZ-Scraps-Report-2025-01-31-Kind-1".
    pub fn report_file_stem(&self, date: time::Date, kind_number: u8) -> String {
        format!(
            "{}-Report-{}-Kind-{kind_number}",
            self.name.replace(' ', "-"),
            date
        )
    }
}
