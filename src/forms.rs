//! Form fields for editing catalog entities.
//!
//! A [`FormField`] pairs an [`InputParser`] (raw submitted text to a typed
//! [`FieldValue`]) with a [`Widget`] (typed value back to display text). Fields are
//! composed, not subclassed: the price field is just the decimal parser wrapped to
//! strip thousands separators, paired with a widget that does the same for display.

use crate::validation::is_valid_slug;
use rust_decimal::Decimal;
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    str::FromStr,
};
use thiserror::Error;

/// A cleaned (or initial) form value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// No value submitted
    Empty,
    /// Free text
    Text(String),
    /// Whole number
    Integer(i64),
    /// Exact decimal
    Decimal(Decimal),
    /// Floating point, only produced for display
    Float(f64),
    /// Checkbox state
    Bool(bool),
}

impl FieldValue {
    /// True for [`FieldValue::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Float(x) => f.write_str(&float_repr(*x)),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
        }
    }
}

/// Shortest round-trip text for `x`, always with a fractional part (`1234.0`) and in
/// exponent form outside `1e-4..1e16` (`1e+20`, `1.5e-07`).
fn float_repr(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{x:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if x != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs());
    }

    let plain = x.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}

/// Removes `_` digit separators (`1_000`). `None` if an underscore is not between two digits.
fn strip_digit_separators(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            let after_digit = prev.is_some_and(|p| p.is_ascii_digit());
            let before_digit = chars.peek().is_some_and(char::is_ascii_digit);
            if !(after_digit && before_digit) {
                return None;
            }
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    Some(out)
}

/// Why a single field failed to clean
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Required field left blank
    #[error("This field is required.")]
    Required,
    /// Not parseable as a decimal
    #[error("Enter a number.")]
    InvalidNumber,
    /// Not parseable as an integer
    #[error("Enter a whole number.")]
    InvalidInteger,
    /// Too many digits overall
    #[error("Ensure that there are no more than {max} digits in total.")]
    MaxDigits {
        /// Allowed digits
        max: u32,
    },
    /// Too many digits after the decimal point
    #[error("Ensure that there are no more than {max} decimal places.")]
    MaxDecimalPlaces {
        /// Allowed decimal places
        max: u32,
    },
    /// Too many digits before the decimal point
    #[error("Ensure that there are no more than {max} digits before the decimal point.")]
    MaxWholeDigits {
        /// Allowed whole digits
        max: u32,
    },
    /// Text longer than allowed
    #[error("Ensure this value has at most {max} characters (it has {length}).")]
    MaxLength {
        /// Allowed characters
        max: usize,
        /// Submitted characters
        length: usize,
    },
    /// Integer below the allowed range
    #[error("Ensure this value is greater than or equal to {min}.")]
    MinValue {
        /// Smallest allowed value
        min: i64,
    },
    /// Integer above the allowed range
    #[error("Ensure this value is less than or equal to {max}.")]
    MaxValue {
        /// Largest allowed value
        max: i64,
    },
    /// Slug with characters outside `[A-Za-z0-9_-]`
    #[error("Enter a valid slug consisting of letters, numbers, underscores or hyphens.")]
    InvalidSlug,
}

/// Per-field errors from [`Form::clean`], keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, FieldError>);

impl FormErrors {
    /// Error recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    /// Number of fields that failed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {error}")?;
            first = false;
        }
        Ok(())
    }
}

/// Successfully cleaned values, keyed by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedData(BTreeMap<String, FieldValue>);

impl CleanedData {
    /// Raw cleaned value of `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Text value; blank or missing fields give an empty string.
    #[must_use]
    pub fn text(&self, field: &str) -> String {
        match self.0.get(field) {
            Some(FieldValue::Text(text)) => text.clone(),
            _ => String::new(),
        }
    }

    /// Decimal value, if present.
    #[must_use]
    pub fn decimal(&self, field: &str) -> Option<Decimal> {
        match self.0.get(field) {
            Some(FieldValue::Decimal(d)) => Some(*d),
            _ => None,
        }
    }

    /// Integer value, if present.
    #[must_use]
    pub fn integer(&self, field: &str) -> Option<i64> {
        match self.0.get(field) {
            Some(FieldValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    /// Checkbox value; missing fields are unchecked.
    #[must_use]
    pub fn bool(&self, field: &str) -> bool {
        matches!(self.0.get(field), Some(FieldValue::Bool(true)))
    }
}

/// Parsing strategy: submitted text to a typed value.
///
/// Input arrives trimmed. An empty string should map to [`FieldValue::Empty`] unless
/// the field has a natural blank value (an unchecked checkbox).
pub trait InputParser: Send + Sync {
    /// Converts submitted text into a value.
    ///
    /// # Errors
    /// Returns a [`FieldError`] describing why the text is unacceptable.
    fn to_value(&self, raw: &str) -> Result<FieldValue, FieldError>;
}

/// Rendering strategy: typed value to display text and HTML.
pub trait Widget: Send + Sync {
    /// HTML `type` of the rendered `<input>`.
    fn input_type(&self) -> &'static str {
        "text"
    }

    /// Text shown inside the widget for `value`.
    fn format_value(&self, value: &FieldValue) -> String {
        value.to_string()
    }

    /// Renders the widget as HTML.
    fn render(&self, name: &str, value: &FieldValue) -> String {
        let formatted = self.format_value(value);
        if formatted.is_empty() {
            format!(
                r#"<input type="{}" name="{}">"#,
                self.input_type(),
                escape_html(name)
            )
        } else {
            format!(
                r#"<input type="{}" name="{}" value="{}">"#,
                self.input_type(),
                escape_html(name),
                escape_html(&formatted)
            )
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Length-limited free text
#[derive(Debug, Clone, Copy)]
pub struct CharParser {
    /// Maximum number of characters
    pub max_length: usize,
}

impl InputParser for CharParser {
    fn to_value(&self, raw: &str) -> Result<FieldValue, FieldError> {
        if raw.is_empty() {
            return Ok(FieldValue::Empty);
        }
        let length = raw.chars().count();
        if length > self.max_length {
            return Err(FieldError::MaxLength {
                max: self.max_length,
                length,
            });
        }
        Ok(FieldValue::Text(raw.to_string()))
    }
}

/// Length-limited URL-safe identifier
#[derive(Debug, Clone, Copy)]
pub struct SlugParser {
    /// Maximum number of characters
    pub max_length: usize,
}

impl InputParser for SlugParser {
    fn to_value(&self, raw: &str) -> Result<FieldValue, FieldError> {
        let value = CharParser {
            max_length: self.max_length,
        }
        .to_value(raw)?;
        if matches!(&value, FieldValue::Text(slug) if !is_valid_slug(slug)) {
            return Err(FieldError::InvalidSlug);
        }
        Ok(value)
    }
}

/// Bounded integer
#[derive(Debug, Clone, Copy)]
pub struct IntegerParser {
    /// Smallest accepted value
    pub min: i64,
    /// Largest accepted value
    pub max: i64,
}

impl IntegerParser {
    /// Accepts anything that fits an `i32` column.
    #[must_use]
    pub const fn i32() -> Self {
        Self {
            min: i32::MIN as i64,
            max: i32::MAX as i64,
        }
    }

    /// Accepts any `i64`.
    #[must_use]
    pub const fn i64() -> Self {
        Self {
            min: i64::MIN,
            max: i64::MAX,
        }
    }
}

impl InputParser for IntegerParser {
    fn to_value(&self, raw: &str) -> Result<FieldValue, FieldError> {
        if raw.is_empty() {
            return Ok(FieldValue::Empty);
        }
        let n: i64 = raw.parse().map_err(|_| FieldError::InvalidInteger)?;
        if n < self.min {
            return Err(FieldError::MinValue { min: self.min });
        }
        if n > self.max {
            return Err(FieldError::MaxValue { max: self.max });
        }
        Ok(FieldValue::Integer(n))
    }
}

/// Checkbox; anything but a blank, `false`, `0` or `off` is checked
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanParser;

impl InputParser for BooleanParser {
    fn to_value(&self, raw: &str) -> Result<FieldValue, FieldError> {
        let checked = !matches!(
            raw.to_ascii_lowercase().as_str(),
            "" | "false" | "0" | "off"
        );
        Ok(FieldValue::Bool(checked))
    }
}

/// Standard decimal parsing with digit limits
#[derive(Debug, Clone, Copy)]
pub struct DecimalParser {
    /// Total digits allowed
    pub max_digits: u32,
    /// Digits allowed after the decimal point
    pub decimal_places: u32,
}

impl InputParser for DecimalParser {
    fn to_value(&self, raw: &str) -> Result<FieldValue, FieldError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(FieldValue::Empty);
        }
        let value = Decimal::from_str(raw).map_err(|_| FieldError::InvalidNumber)?;

        let decimals = value.scale();
        let mantissa_digits = u32::try_from(value.mantissa().unsigned_abs().to_string().len())
            .unwrap_or(u32::MAX);
        // "0.00" has a single mantissa digit but still occupies two decimal places
        let digits = mantissa_digits.max(decimals);
        let whole_digits = digits - decimals;
        let max_whole_digits = self.max_digits.saturating_sub(self.decimal_places);

        if digits > self.max_digits {
            return Err(FieldError::MaxDigits {
                max: self.max_digits,
            });
        }
        if decimals > self.decimal_places {
            return Err(FieldError::MaxDecimalPlaces {
                max: self.decimal_places,
            });
        }
        if whole_digits > max_whole_digits {
            return Err(FieldError::MaxWholeDigits {
                max: max_whole_digits,
            });
        }
        Ok(FieldValue::Decimal(value))
    }
}

/// Decimal field that tolerates thousands separators: `"1,234.50"` parses as `1234.50`.
///
/// Commas are removed and the rest is handed to [`DecimalParser`] unchanged, so
/// malformed input still fails with [`FieldError::InvalidNumber`].
#[derive(Debug, Clone, Copy)]
pub struct PriceFormField {
    decimal: DecimalParser,
}

impl PriceFormField {
    /// Price field with the given digit limits.
    #[must_use]
    pub const fn new(max_digits: u32, decimal_places: u32) -> Self {
        Self {
            decimal: DecimalParser {
                max_digits,
                decimal_places,
            },
        }
    }
}

impl InputParser for PriceFormField {
    fn to_value(&self, raw: &str) -> Result<FieldValue, FieldError> {
        self.decimal.to_value(raw.trim().replace(',', "").as_str())
    }
}

/// Single-line text box
#[derive(Debug, Clone, Copy, Default)]
pub struct TextInput;

impl Widget for TextInput {}

/// Numeric input box
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberInput;

impl Widget for NumberInput {
    fn input_type(&self) -> &'static str {
        "number"
    }
}

/// Multi-line text area
#[derive(Debug, Clone, Copy, Default)]
pub struct Textarea;

impl Widget for Textarea {
    fn render(&self, name: &str, value: &FieldValue) -> String {
        format!(
            r#"<textarea name="{}">{}</textarea>"#,
            escape_html(name),
            escape_html(&self.format_value(value))
        )
    }
}

/// Checkbox
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckboxInput;

impl Widget for CheckboxInput {
    fn input_type(&self) -> &'static str {
        "checkbox"
    }

    fn render(&self, name: &str, value: &FieldValue) -> String {
        let checked = if matches!(value, FieldValue::Bool(true)) {
            " checked"
        } else {
            ""
        };
        format!(
            r#"<input type="checkbox" name="{}"{checked}>"#,
            escape_html(name)
        )
    }
}

/// Text box that shows prices without thousands separators.
///
/// String values have their commas removed and are shown as a float (`"1,234"` shows
/// `1234.0`). `_` between digits is accepted as a separator too. When the conversion
/// fails the box is left blank instead of reporting an error; the field's parser is
/// the strict side.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceWidget;

impl Widget for PriceWidget {
    fn format_value(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Text(text) => strip_digit_separators(&text.replace(',', ""))
                .and_then(|text| text.trim().parse::<f64>().ok())
                .map(|price| FieldValue::Float(price).to_string())
                .unwrap_or_default(),
            other => other.to_string(),
        }
    }
}

/// One form field: how to parse it, how to show it, and whether it may be blank
pub struct FormField {
    parser: Box<dyn InputParser>,
    widget: Box<dyn Widget>,
    required: bool,
}

impl FormField {
    /// Required field built from a parser and a widget.
    #[must_use]
    pub fn new(parser: impl InputParser + 'static, widget: impl Widget + 'static) -> Self {
        Self {
            parser: Box::new(parser),
            widget: Box::new(widget),
            required: true,
        }
    }

    /// Marks the field as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Whether a blank submission is rejected.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// The field's widget.
    #[must_use]
    pub fn widget(&self) -> &dyn Widget {
        self.widget.as_ref()
    }

    /// Parses a submitted value, then enforces `required`.
    ///
    /// # Errors
    /// Returns the parser's error, or [`FieldError::Required`] for a blank required field.
    pub fn clean(&self, raw: Option<&str>) -> Result<FieldValue, FieldError> {
        let value = self.parser.to_value(raw.unwrap_or_default().trim())?;
        if self.required && value.is_empty() {
            return Err(FieldError::Required);
        }
        Ok(value)
    }
}

impl fmt::Debug for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormField")
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of named fields
#[derive(Debug, Default)]
pub struct Form {
    fields: Vec<(String, FormField)>,
}

impl Form {
    /// Empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field at the end.
    #[must_use]
    pub fn with_field(mut self, name: &str, field: FormField) -> Self {
        self.set_field(name, field);
        self
    }

    /// Replaces the field called `name` in place, or appends it if absent.
    pub fn set_field(&mut self, name: &str, field: FormField) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = field,
            None => self.fields.push((name.to_string(), field)),
        }
    }

    /// Field called `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields
            .iter()
            .find_map(|(n, field)| (n == name).then_some(field))
    }

    /// Field names in display order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Cleans every field from submitted data. All fields are checked; errors are
    /// collected rather than stopping at the first one.
    ///
    /// # Errors
    /// Returns [`FormErrors`] naming each field that failed.
    pub fn clean(&self, data: &HashMap<String, String>) -> Result<CleanedData, FormErrors> {
        let mut cleaned = BTreeMap::new();
        let mut errors = BTreeMap::new();
        for (name, field) in &self.fields {
            match field.clean(data.get(name).map(String::as_str)) {
                Ok(value) => {
                    cleaned.insert(name.clone(), value);
                }
                Err(error) => {
                    errors.insert(name.clone(), error);
                }
            }
        }
        if errors.is_empty() {
            Ok(CleanedData(cleaned))
        } else {
            Err(FormErrors(errors))
        }
    }

    /// Renders every field with its value from `values` (blank when absent).
    #[must_use]
    pub fn render(&self, values: &HashMap<String, FieldValue>) -> String {
        self.fields
            .iter()
            .map(|(name, field)| {
                field
                    .widget
                    .render(name, values.get(name).unwrap_or(&FieldValue::Empty))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Standard create/edit form for a product.
#[must_use]
pub fn product_form() -> Form {
    Form::new()
        .with_field(
            "product_name",
            FormField::new(CharParser { max_length: 200 }, TextInput),
        )
        .with_field(
            "slug",
            FormField::new(SlugParser { max_length: 200 }, TextInput),
        )
        .with_field(
            "description",
            FormField::new(CharParser { max_length: 500 }, Textarea).optional(),
        )
        .with_field(
            "price",
            FormField::new(
                DecimalParser {
                    max_digits: 10,
                    decimal_places: 2,
                },
                NumberInput,
            ),
        )
        .with_field("stock", FormField::new(IntegerParser::i32(), NumberInput))
        .with_field(
            "is_available",
            FormField::new(BooleanParser, CheckboxInput).optional(),
        )
        .with_field("category", FormField::new(IntegerParser::i64(), NumberInput))
}

/// Product form with the price field swapped for the comma-tolerant
/// [`PriceFormField`] / [`PriceWidget`] pair.
#[must_use]
pub fn get_form() -> Form {
    let mut form = product_form();
    form.set_field(
        "price",
        FormField::new(PriceFormField::new(10, 2), PriceWidget),
    );
    form
}
