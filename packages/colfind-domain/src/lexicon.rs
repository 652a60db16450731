use std::{collections::HashMap, fs, io, path::Path};

/// Read-only synonym source consulted during query expansion.
pub trait Thesaurus
where
	Self: Send + Sync,
{
	/// Every lemma sharing a synset with `word`, in raw lemma form (multiword lemmas keep their
	/// underscores).
	fn synonyms(&self, word: &str) -> Vec<String>;
}

pub struct NoThesaurus;
impl Thesaurus for NoThesaurus {
	fn synonyms(&self, _word: &str) -> Vec<String> {
		Vec::new()
	}
}

/// Synsets loaded from a plain-text table: one synset per line, lemmas separated by whitespace,
/// `#` starts a comment. This is the shape WordNet lemma dumps export to.
#[derive(Debug, Default)]
pub struct SynonymTable {
	synsets: Vec<Vec<String>>,
	index: HashMap<String, Vec<usize>>,
}
impl SynonymTable {
	pub fn load(path: &Path) -> io::Result<Self> {
		let raw = fs::read_to_string(path)?;

		Ok(Self::parse(&raw))
	}

	pub fn parse(raw: &str) -> Self {
		let mut table = Self::default();

		for line in raw.lines() {
			let content = line.split('#').next().unwrap_or_default();
			let lemmas: Vec<String> =
				content.split_whitespace().map(|lemma| lemma.to_lowercase()).collect();

			if lemmas.len() < 2 {
				continue;
			}

			let synset_id = table.synsets.len();

			for lemma in &lemmas {
				let entry = table.index.entry(lemma.clone()).or_default();

				if !entry.contains(&synset_id) {
					entry.push(synset_id);
				}
			}

			table.synsets.push(lemmas);
		}

		table
	}

	pub fn len(&self) -> usize {
		self.synsets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.synsets.is_empty()
	}
}
impl Thesaurus for SynonymTable {
	fn synonyms(&self, word: &str) -> Vec<String> {
		let key = word.trim().to_lowercase().replace(' ', "_");
		let Some(synset_ids) = self.index.get(&key) else {
			return Vec::new();
		};
		let mut out = Vec::new();

		for synset_id in synset_ids {
			for lemma in &self.synsets[*synset_id] {
				if !out.contains(lemma) {
					out.push(lemma.clone());
				}
			}
		}

		out
	}
}
