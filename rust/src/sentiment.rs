//! Lexicon-based sentiment scoring.
//!
//! AFINN-style scorer: tokenize, sum known word valences, flip the sign of
//! a word preceded by a negator, and nudge magnitude up or down for degree
//! modifiers ("very good" scores higher than "good"). Pure and
//! deterministic for a given text, which keeps a record's sentiment stable
//! across runs.

use std::collections::{HashMap, HashSet};

use crate::models::Sentiment;

/// Word valences, AFINN-style in the range [-5, 5].
const LEXICON: &[(&str, i32)] = &[
    // positive
    ("amazing", 4),
    ("awesome", 4),
    ("beautiful", 3),
    ("best", 3),
    ("better", 2),
    ("brilliant", 4),
    ("clean", 2),
    ("cool", 1),
    ("delight", 3),
    ("delighted", 3),
    ("delightful", 3),
    ("easy", 1),
    ("enjoy", 2),
    ("enjoyed", 2),
    ("excellent", 3),
    ("fantastic", 4),
    ("fast", 1),
    ("fine", 2),
    ("glad", 3),
    ("good", 3),
    ("great", 3),
    ("happy", 3),
    ("helpful", 2),
    ("impressed", 3),
    ("impressive", 3),
    ("intuitive", 2),
    ("like", 2),
    ("liked", 2),
    ("likes", 2),
    ("love", 3),
    ("loved", 3),
    ("loves", 3),
    ("nice", 3),
    ("outstanding", 5),
    ("perfect", 3),
    ("pleasant", 3),
    ("pleased", 3),
    ("recommend", 2),
    ("recommended", 2),
    ("reliable", 2),
    ("responsive", 2),
    ("satisfied", 2),
    ("smooth", 2),
    ("solid", 2),
    ("stellar", 3),
    ("superb", 5),
    ("thank", 2),
    ("thanks", 2),
    ("useful", 2),
    ("wonderful", 4),
    // negative
    ("angry", -3),
    ("annoyed", -2),
    ("annoying", -2),
    ("awful", -3),
    ("bad", -3),
    ("broken", -1),
    ("bug", -2),
    ("buggy", -3),
    ("confused", -2),
    ("confusing", -2),
    ("crash", -2),
    ("crashed", -2),
    ("crashes", -2),
    ("dead", -3),
    ("difficult", -1),
    ("disappointed", -2),
    ("disappointing", -2),
    ("error", -2),
    ("errors", -2),
    ("fail", -2),
    ("failed", -2),
    ("fails", -2),
    ("failure", -2),
    ("frustrated", -2),
    ("frustrating", -2),
    ("garbage", -3),
    ("hate", -3),
    ("hated", -3),
    ("hates", -3),
    ("horrible", -3),
    ("lose", -3),
    ("lost", -3),
    ("mad", -3),
    ("missing", -2),
    ("nasty", -3),
    ("pain", -2),
    ("painful", -2),
    ("poor", -2),
    ("problem", -2),
    ("problems", -2),
    ("regret", -2),
    ("ridiculous", -3),
    ("rude", -2),
    ("sad", -2),
    ("scam", -2),
    ("slow", -2),
    ("sluggish", -2),
    ("stupid", -2),
    ("sucked", -3),
    ("sucks", -3),
    ("terrible", -3),
    ("ugly", -3),
    ("unhappy", -2),
    ("unusable", -3),
    ("useless", -2),
    ("worse", -3),
    ("worst", -3),
    ("wrong", -2),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "cannot", "can't", "cant", "don't", "dont", "doesn't",
    "doesnt", "didn't", "didnt", "isn't", "isnt", "wasn't", "wasnt", "won't", "wont", "wouldn't",
    "wouldnt", "shouldn't", "shouldnt", "aren't", "arent", "ain't", "aint", "without", "barely",
    "hardly",
];

const AMPLIFIERS: &[&str] = &[
    "very",
    "really",
    "extremely",
    "incredibly",
    "absolutely",
    "totally",
    "completely",
    "utterly",
    "super",
    "so",
    "highly",
    "truly",
];

const DAMPENERS: &[&str] = &[
    "slightly",
    "somewhat",
    "fairly",
    "kinda",
    "sorta",
    "marginally",
    "mildly",
    "moderately",
];

/// Sentiment analyzer - scores text against a fixed lexicon.
pub struct SentimentAnalyzer {
    lexicon: HashMap<&'static str, i32>,
    negators: HashSet<&'static str>,
    amplifiers: HashSet<&'static str>,
    dampeners: HashSet<&'static str>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            negators: NEGATORS.iter().copied().collect(),
            amplifiers: AMPLIFIERS.iter().copied().collect(),
            dampeners: DAMPENERS.iter().copied().collect(),
        }
    }

    /// Compute the raw polarity score for a text.
    pub fn score(&self, text: &str) -> i32 {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|t| !t.is_empty())
            .collect();

        let mut score = 0;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = self.lexicon.get(token) else {
                continue;
            };
            score += self.adjust(valence, &tokens[..i]);
        }
        score
    }

    /// Map a text to its three-way label: score > 1 is positive,
    /// score < -1 is negative, everything in [-1, 1] is neutral.
    pub fn classify(&self, text: &str) -> Sentiment {
        let score = self.score(text);
        if score > 1 {
            Sentiment::Positive
        } else if score < -1 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    /// Classify one submission.
    ///
    /// The scored text is `"{message} {name}"` with the space appended even
    /// for an empty name. The trailing space is deliberate: it matches the
    /// historical wire-format of the scorer input and tokenization makes it
    /// semantically inert.
    pub fn classify_submission(&self, message: &str, name: &str) -> Sentiment {
        self.classify(&format!("{message} {name}"))
    }

    // Walk backwards over adjacent modifiers: the nearest negator flips the
    // sign, amplifiers and dampeners move the magnitude by one.
    fn adjust(&self, valence: i32, preceding: &[&str]) -> i32 {
        let mut adjusted = valence;
        for token in preceding.iter().rev().take(2) {
            if self.negators.contains(token) {
                adjusted = -adjusted;
            } else if self.amplifiers.contains(token) {
                adjusted += adjusted.signum();
            } else if self.dampeners.contains(token) {
                adjusted -= adjusted.signum() * i32::from(adjusted.abs() > 1);
            } else {
                break;
            }
        }
        adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strongly_positive_text_is_positive() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(
            analyzer.classify("This is excellent, wonderful, amazing!"),
            Sentiment::Positive
        );
    }

    #[test]
    fn strongly_negative_text_is_negative() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(
            analyzer.classify("This is terrible, awful, horrible."),
            Sentiment::Negative
        );
    }

    #[test]
    fn neutral_text_stays_neutral() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(
            analyzer.classify("The meeting is at 3pm."),
            Sentiment::Neutral
        );
        assert_eq!(analyzer.classify(""), Sentiment::Neutral);
    }

    #[test]
    fn single_weak_word_is_within_neutral_band() {
        let analyzer = SentimentAnalyzer::new();
        // "easy" scores 1, inside the inclusive [-1, 1] neutral band.
        assert_eq!(analyzer.score("easy"), 1);
        assert_eq!(analyzer.classify("easy"), Sentiment::Neutral);
    }

    #[test]
    fn negation_flips_valence() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.score("not good"), -3);
        assert_eq!(analyzer.classify("not good"), Sentiment::Negative);
        assert_eq!(analyzer.classify("don't hate it"), Sentiment::Positive);
    }

    #[test]
    fn amplifiers_and_dampeners_shift_magnitude() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.score("very good"), 4);
        assert_eq!(analyzer.score("slightly good"), 2);
        assert_eq!(analyzer.score("very bad"), -4);
        // Chained: negator behind the amplifier still flips.
        assert_eq!(analyzer.score("not very good"), -4);
    }

    #[test]
    fn classification_is_deterministic() {
        let analyzer = SentimentAnalyzer::new();
        let text = "great product but the installer crashed";
        let first = analyzer.classify(text);
        for _ in 0..10 {
            assert_eq!(analyzer.classify(text), first);
        }
    }

    #[test]
    fn submission_concatenation_keeps_trailing_space() {
        let analyzer = SentimentAnalyzer::new();
        // An empty name yields "message " with a trailing space; the result
        // must match scoring the message alone.
        assert_eq!(
            analyzer.classify_submission("This is excellent, wonderful, amazing!", ""),
            analyzer.classify("This is excellent, wonderful, amazing!")
        );
        // A name with scored words contributes to the score.
        assert_eq!(
            analyzer.classify_submission("it is fine", "Happy Customer"),
            Sentiment::Positive
        );
    }
}
