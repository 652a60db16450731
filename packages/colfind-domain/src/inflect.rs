//! Rule-based English noun inflection.
//!
//! Covers the regular suffix rules plus a small table of irregular and uninflected nouns. Only
//! purely alphabetic words are inflected; identifiers with digits pass through untouched.

const IRREGULAR: [(&str, &str); 24] = [
	("analysis", "analyses"),
	("axis", "axes"),
	("child", "children"),
	("criterion", "criteria"),
	("crisis", "crises"),
	("datum", "data"),
	("diagnosis", "diagnoses"),
	("foot", "feet"),
	("goose", "geese"),
	("hypothesis", "hypotheses"),
	("louse", "lice"),
	("man", "men"),
	("medium", "media"),
	("mouse", "mice"),
	("ox", "oxen"),
	("person", "people"),
	("phenomenon", "phenomena"),
	("prognosis", "prognoses"),
	("stimulus", "stimuli"),
	("synthesis", "syntheses"),
	("thesis", "theses"),
	("tooth", "teeth"),
	("vertebra", "vertebrae"),
	("woman", "women"),
];
const UNINFLECTED: [&str; 16] = [
	"aircraft",
	"bison",
	"deer",
	"equipment",
	"fish",
	"information",
	"moose",
	"news",
	"research",
	"salmon",
	"series",
	"sheep",
	"software",
	"species",
	"swine",
	"trout",
];
const F_TO_VES: [(&str, &str); 10] = [
	("calf", "calves"),
	("half", "halves"),
	("knife", "knives"),
	("leaf", "leaves"),
	("life", "lives"),
	("loaf", "loaves"),
	("shelf", "shelves"),
	("thief", "thieves"),
	("wife", "wives"),
	("wolf", "wolves"),
];
const O_TO_OES: [&str; 6] = ["echo", "hero", "potato", "tomato", "torpedo", "veto"];
const NOT_PLURAL_ENDINGS: [&str; 4] = ["ss", "us", "is", "ous"];

/// Plural form of a singular noun. Returns `None` for words that are already plural, do not
/// inflect, or are not purely alphabetic.
pub fn plural(word: &str) -> Option<String> {
	if !is_inflectable(word) || listed(&UNINFLECTED, word) || singular(word).is_some() {
		return None;
	}
	if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
		return Some((*plural).to_string());
	}
	if let Some((_, plural)) = F_TO_VES.iter().find(|(singular, _)| *singular == word) {
		return Some((*plural).to_string());
	}
	if let Some(stem) = word.strip_suffix('y')
		&& !stem.is_empty()
		&& !ends_with_vowel(stem)
	{
		return Some(format!("{stem}ies"));
	}
	if let Some(stem) = word.strip_suffix("is")
		&& word.len() > 3
	{
		return Some(format!("{stem}es"));
	}
	if ["s", "sh", "ch", "x", "z"].iter().any(|suffix| word.ends_with(suffix)) {
		return Some(format!("{word}es"));
	}
	if listed(&O_TO_OES, word) {
		return Some(format!("{word}es"));
	}

	Some(format!("{word}s"))
}

/// Singular form of a plural noun, or `None` when the word does not look plural.
pub fn singular(word: &str) -> Option<String> {
	if !is_inflectable(word) || word.len() < 3 || listed(&UNINFLECTED, word) {
		return None;
	}
	if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == word) {
		return Some((*singular).to_string());
	}
	if let Some((singular, _)) = F_TO_VES.iter().find(|(_, plural)| *plural == word) {
		return Some((*singular).to_string());
	}
	if let Some(stem) = word.strip_suffix("ies")
		&& stem.len() > 1
	{
		return Some(format!("{stem}y"));
	}
	if let Some(stem) = word.strip_suffix("es")
		&& (["ss", "sh", "ch", "x", "z"].iter().any(|suffix| stem.ends_with(suffix))
			|| listed(&O_TO_OES, stem))
	{
		return Some(stem.to_string());
	}
	if NOT_PLURAL_ENDINGS.iter().any(|suffix| word.ends_with(suffix)) {
		return None;
	}

	word.strip_suffix('s').map(str::to_string)
}

fn listed(list: &[&str], word: &str) -> bool {
	list.iter().any(|candidate| *candidate == word)
}

fn is_inflectable(word: &str) -> bool {
	!word.is_empty() && word.chars().all(|ch| ch.is_alphabetic())
}

fn ends_with_vowel(stem: &str) -> bool {
	stem.chars().last().map(|ch| matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u')).unwrap_or(false)
}
