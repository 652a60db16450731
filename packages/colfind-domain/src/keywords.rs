use std::{
	collections::BTreeSet,
	sync::{Arc, LazyLock},
};

use regex::Regex;
use url::Url;

use crate::{
	inflect,
	lexicon::{NoThesaurus, Thesaurus},
};

pub type KeywordSet = BTreeSet<String>;

/// Every ASCII character that is not a letter or a digit separates tokens.
const DELIMITER_PATTERN: &str = r"[\x00-\x2F\x3A-\x40\x5B-\x60\x7B-\x7F]+";
const STRIP_CHARS: [char; 6] = ['.', ',', '!', '?', ':', ';'];
const URL_PREFIX: &str = "http";
const TEXT_DATA_THRESHOLD: f64 = 0.5;

static DELIMITERS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(DELIMITER_PATTERN).expect("Delimiter pattern must compile."));

/// Query-side keyword extraction with morphological and synonym expansion.
#[derive(Clone)]
pub struct Normalizer {
	thesaurus: Arc<dyn Thesaurus>,
	expand_morphology: bool,
}
impl Normalizer {
	pub fn new(thesaurus: Arc<dyn Thesaurus>, expand_morphology: bool) -> Self {
		Self { thesaurus, expand_morphology }
	}

	pub fn normalize<I, S>(&self, inputs: I) -> KeywordSet
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut keywords = extract_keywords(inputs);

		if self.expand_morphology {
			expand_morphology(&mut keywords);
		}

		self.expand_synonyms(&mut keywords);

		keywords
	}

	fn expand_synonyms(&self, keywords: &mut KeywordSet) {
		let base: Vec<String> = keywords.iter().cloned().collect();

		for word in base {
			for synonym in self.thesaurus.synonyms(&word) {
				let synonym = synonym.replace('_', " ").to_lowercase();

				if !synonym.trim().is_empty() {
					keywords.insert(synonym);
				}
			}
		}
	}
}
impl Default for Normalizer {
	fn default() -> Self {
		Self::new(Arc::new(NoThesaurus), true)
	}
}

/// Tokenizes and cleans text without any expansion.
pub fn extract_keywords<I, S>(inputs: I) -> KeywordSet
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut keywords = KeywordSet::new();

	for input in inputs {
		push_keywords(&mut keywords, input.as_ref());
	}

	keywords
}

/// Storage-side extraction used when building column metadata. Numeric samples carry no
/// keywords.
pub fn extract_column_keywords<I, S>(samples: I) -> KeywordSet
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut keywords = KeywordSet::new();

	for sample in samples {
		let sample = sample.as_ref();

		if is_numeric_string(sample) {
			continue;
		}

		push_keywords(&mut keywords, sample);
	}

	keywords
}

pub fn is_numeric_string(raw: &str) -> bool {
	let trimmed = raw.trim();

	!trimmed.is_empty() && trimmed.parse::<f64>().is_ok()
}

/// Reports whether more than half of the non-blank samples are non-numeric text.
pub fn is_text_data<S>(samples: &[S]) -> bool
where
	S: AsRef<str>,
{
	is_text_data_with_threshold(samples, TEXT_DATA_THRESHOLD)
}

pub fn is_text_data_with_threshold<S>(samples: &[S], threshold: f64) -> bool
where
	S: AsRef<str>,
{
	let mut valid = 0_usize;
	let mut text = 0_usize;

	for sample in samples {
		let sample = sample.as_ref();

		if sample.trim().is_empty() {
			continue;
		}

		valid += 1;

		if !is_numeric_string(sample) {
			text += 1;
		}
	}

	if valid == 0 {
		return false;
	}

	(text as f64 / valid as f64) > threshold
}

pub fn expand_morphology(keywords: &mut KeywordSet) {
	let base: Vec<String> = keywords.iter().cloned().collect();

	for word in base {
		if let Some(plural) = inflect::plural(&word) {
			keywords.insert(plural);
		}
		if let Some(singular) = inflect::singular(&word) {
			keywords.insert(singular);
		}
	}
}

fn push_keywords(keywords: &mut KeywordSet, input: &str) {
	for chunk in input.split(|ch: char| ch.is_whitespace() || ch.is_control()) {
		if chunk.is_empty() {
			continue;
		}

		let lowered = chunk.to_lowercase();

		if lowered.starts_with(URL_PREFIX)
			&& let Some(domain) = url_keyword(&lowered)
		{
			keywords.insert(domain);

			continue;
		}

		for token in DELIMITERS.split(&lowered) {
			let cleaned = token.trim_matches(STRIP_CHARS.as_slice());

			if cleaned.is_empty() {
				continue;
			}
			// Prefixed tokens follow the URL rule and are dropped when they do not parse.
			if cleaned.starts_with(URL_PREFIX) {
				if let Some(domain) = url_keyword(cleaned) {
					keywords.insert(domain);
				}

				continue;
			}

			keywords.insert(cleaned.to_string());
		}
	}
}

fn url_keyword(token: &str) -> Option<String> {
	let parsed = Url::parse(token).ok()?;
	let host = parsed.host_str()?;
	let labels: Vec<&str> = host.split('.').collect();
	let domain = match labels.as_slice() {
		["www", second, ..] => *second,
		[first, ..] => *first,
		[] => return None,
	};

	if domain.is_empty() { None } else { Some(domain.to_string()) }
}
