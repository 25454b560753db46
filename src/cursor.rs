//! Validated hour and month stamps used as resume cursors and query bounds.

// std
use std::{borrow::Borrow, ops::Deref};
// crates.io
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::_prelude::*;

macro_rules! def_stamp {
	($name:ident, $doc:literal, $kind:literal, $validate:path) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new stamp after format validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, StampError> {
				let view = value.as_ref();

				$validate(view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = StampError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				$validate(&value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = StampError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Error returned when stamp validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum StampError {
	/// The value does not match the expected layout.
	#[error("{kind} stamp `{value}` does not match the `{layout}` layout.")]
	Malformed {
		/// Kind of stamp (hour, month).
		kind: &'static str,
		/// Offending value.
		value: String,
		/// Expected layout.
		layout: &'static str,
	},
	/// A calendar component is out of range.
	#[error("{kind} stamp `{value}` contains an out-of-range calendar component.")]
	OutOfRange {
		/// Kind of stamp (hour, month).
		kind: &'static str,
		/// Offending value.
		value: String,
	},
}

def_stamp! { HourStamp, "UTC hour stamp in the `YYYY-MM-DDTHH` layout.", "Hour", validate_hour }
def_stamp! { MonthStamp, "UTC month stamp in the `YYYY-MM` layout.", "Month", validate_month }

impl HourStamp {
	/// Returns the current UTC hour truncated to hour granularity.
	pub fn now_utc() -> Self {
		let now = OffsetDateTime::now_utc();

		Self(format!(
			"{:04}-{:02}-{:02}T{:02}",
			now.year(),
			u8::from(now.month()),
			now.day(),
			now.hour(),
		))
	}
}

fn validate_hour(view: &str) -> Result<(), StampError> {
	let malformed = || StampError::Malformed {
		kind: "Hour",
		value: view.to_owned(),
		layout: "YYYY-MM-DDTHH",
	};

	if view.len() != 13 {
		return Err(malformed());
	}

	let (date, sep, hour) = match (view.get(..10), view.get(10..11), view.get(11..13)) {
		(Some(date), Some(sep), Some(hour)) => (date, sep, hour),
		_ => return Err(malformed()),
	};

	if sep != "T" || !hour.bytes().all(|b| b.is_ascii_digit()) {
		return Err(malformed());
	}
	if Date::parse(date, DATE_FORMAT).is_err() {
		return Err(StampError::OutOfRange { kind: "Hour", value: view.to_owned() });
	}
	if hour.parse::<u8>().map(|h| h >= 24).unwrap_or(true) {
		return Err(StampError::OutOfRange { kind: "Hour", value: view.to_owned() });
	}

	Ok(())
}

fn validate_month(view: &str) -> Result<(), StampError> {
	let malformed =
		|| StampError::Malformed { kind: "Month", value: view.to_owned(), layout: "YYYY-MM" };

	if view.len() != 7 {
		return Err(malformed());
	}

	let (year, sep, month) = match (view.get(..4), view.get(4..5), view.get(5..7)) {
		(Some(year), Some(sep), Some(month)) => (year, sep, month),
		_ => return Err(malformed()),
	};

	if sep != "-"
		|| !year.bytes().all(|b| b.is_ascii_digit())
		|| !month.bytes().all(|b| b.is_ascii_digit())
	{
		return Err(malformed());
	}
	if month.parse::<u8>().map(|m| m == 0 || m > 12).unwrap_or(true) {
		return Err(StampError::OutOfRange { kind: "Month", value: view.to_owned() });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn hour_stamps_validate_layout_and_calendar() {
		HourStamp::new("2019-08-07T12").expect("Hour fixture should be valid.");
		HourStamp::new("2019-08-07T00").expect("Midnight hour should be valid.");

		assert!(HourStamp::new("2019-8-7T12").is_err(), "Unpadded components must be rejected.");
		assert!(HourStamp::new("2019-08-07 12").is_err(), "Missing separator must be rejected.");
		assert!(HourStamp::new("2019-08-07T25").is_err(), "Hour 25 must be rejected.");
		assert!(HourStamp::new("2019-02-30T05").is_err(), "February 30th must be rejected.");
		assert!(HourStamp::new("2019-08-07T+2").is_err(), "Signed hours must be rejected.");
	}

	#[test]
	fn month_stamps_validate_layout_and_calendar() {
		MonthStamp::new("2019-07").expect("Month fixture should be valid.");

		assert!(MonthStamp::new("2019-7").is_err());
		assert!(MonthStamp::new("2019-13").is_err());
		assert!(MonthStamp::new("2019-00").is_err());
		assert!(MonthStamp::new("201907").is_err());
	}

	#[test]
	fn now_utc_matches_the_hour_layout() {
		let now = HourStamp::now_utc();

		HourStamp::new(now.as_ref()).expect("Generated stamp should satisfy its own validator.");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let stamp: HourStamp = serde_json::from_str("\"2019-11-22T18\"")
			.expect("Hour stamp should deserialize successfully.");

		assert_eq!(stamp.as_ref(), "2019-11-22T18");
		assert!(serde_json::from_str::<HourStamp>("\"2019-11-22\"").is_err());
		assert!(serde_json::from_str::<MonthStamp>("\"2019-11-22T18\"").is_err());
	}
}
