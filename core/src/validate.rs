//! Edit-time checks for a block configuration, one function per option
//! group. The lookups they depend on (joke count, category set) are passed
//! in, so the checks stay pure.

use std::sync::LazyLock;

use regex::Regex;

use crate::categories::CategorySet;
use crate::config::{BlockConfiguration, FilterType, Filtering, Renaming};
use crate::error::ValidationError;

/// Form maximum offered when the live count is unknown.
pub const DEFAULT_MAX_QUANTITY: u64 = 500;

static NAME: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").ok());

/// Inclusive range a quantity widget should offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityBounds {
    pub min: u64,
    pub max: u64,
}

/// Bounds for the quantity input given the live joke count (`0` = unknown).
pub fn quantity_bounds(count: u64) -> QuantityBounds {
    QuantityBounds {
        min: 1,
        max: if count > 0 { count } else { DEFAULT_MAX_QUANTITY },
    }
}

/// `count == 0` means the count is unknown and no upper bound applies.
pub fn validate_quantity(quantity: u32, count: u64) -> Result<(), ValidationError> {
    if quantity < 1 {
        return Err(ValidationError::QuantityTooSmall);
    }
    if count > 0 && u64::from(quantity) > count {
        return Err(ValidationError::QuantityExceedsCount {
            quantity,
            max: count,
        });
    }
    Ok(())
}

/// Names must be ASCII letters only. An empty name is allowed and simply
/// leaves that half of the name unchanged.
pub fn validate_renaming(renaming: &Renaming) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !renaming.enable {
        return errors;
    }
    if !is_valid_name(&renaming.first_name) {
        errors.push(ValidationError::InvalidFirstName);
    }
    if !is_valid_name(&renaming.last_name) {
        errors.push(ValidationError::InvalidLastName);
    }
    errors
}

fn is_valid_name(name: &str) -> bool {
    name.is_empty() || NAME.as_ref().is_some_and(|re| re.is_match(name))
}

/// Every selected category of the active filter type must exist upstream.
/// Skipped when `categories` is the fallback set, since it proves nothing.
pub fn validate_filtering(filtering: &Filtering, categories: &CategorySet) -> Vec<ValidationError> {
    if !filtering.enable || categories.is_fallback() {
        return Vec::new();
    }
    let field = match filtering.kind {
        FilterType::Inclusive => "filtering.inclusive",
        FilterType::Exclusive => "filtering.exclusive",
        FilterType::Other(_) => return Vec::new(),
    };
    filtering
        .active_categories()
        .into_iter()
        .flatten()
        .filter(|name| !categories.contains(name))
        .map(|name| ValidationError::UnknownCategory {
            field,
            category: name.clone(),
        })
        .collect()
}

/// Run every group check and collect all errors.
pub fn validate_configuration(
    config: &BlockConfiguration,
    count: u64,
    categories: &CategorySet,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if let Err(err) = validate_quantity(config.quantity, count) {
        errors.push(err);
    }
    errors.extend(validate_renaming(&config.renaming));
    errors.extend(validate_filtering(&config.filtering, categories));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
