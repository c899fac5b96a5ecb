//! Lead selection for the digest index.

use crate::reflow::CleanParagraph;
use crate::text::split_sentences;

/// Default length cap under which a second sentence is appended.
pub const DEFAULT_LEAD_CAP: usize = 220;

/// Picks a one or two sentence lead from cleaned paragraphs.
///
/// The first prose paragraph is preferred; list items are only used when the
/// article has nothing else. Returns an empty string for an empty article.
///
/// # Example
///
/// ```rust
/// use rovat_core::lead::pick_lead;
/// use rovat_core::reflow::CleanParagraph;
///
/// let paragraphs = vec![
///     CleanParagraph::bullet("• bullet"),
///     CleanParagraph::prose("Real sentence one. Real sentence two. Real sentence three."),
/// ];
/// assert_eq!(pick_lead(&paragraphs), "Real sentence one. Real sentence two.");
/// ```
pub fn pick_lead(paragraphs: &[CleanParagraph]) -> String {
    pick_lead_with_cap(paragraphs, DEFAULT_LEAD_CAP)
}

/// [`pick_lead`] with an explicit cap, in characters.
pub fn pick_lead_with_cap(paragraphs: &[CleanParagraph], cap: usize) -> String {
    let Some(chosen) = paragraphs.iter().find(|p| !p.is_list_item).or_else(|| paragraphs.first()) else {
        return String::new();
    };

    let sentences = split_sentences(&chosen.text);
    match sentences.as_slice() {
        [] => String::new(),
        [first] => first.to_string(),
        [first, second, ..] if first.chars().count() < cap => format!("{first} {second}"),
        [first, ..] => first.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(pick_lead(&[]), "");
    }

    #[test]
    fn test_skips_list_items() {
        let paragraphs = vec![
            CleanParagraph::bullet("• bullet"),
            CleanParagraph::prose("Real sentence one. Real sentence two. Real sentence three."),
        ];
        assert_eq!(pick_lead(&paragraphs), "Real sentence one. Real sentence two.");
    }

    #[test]
    fn test_falls_back_to_first_list_item() {
        let paragraphs = vec![CleanParagraph::bullet("• Csak lista."), CleanParagraph::bullet("• Második.")];
        assert_eq!(pick_lead(&paragraphs), "• Csak lista.");
    }

    #[test]
    fn test_single_sentence() {
        let paragraphs = vec![CleanParagraph::prose("Egyetlen mondat ponttal a végén.")];
        assert_eq!(pick_lead(&paragraphs), "Egyetlen mondat ponttal a végén.");
    }

    #[test]
    fn test_long_first_sentence_stands_alone() {
        let first = format!("{}.", "hosszú ".repeat(40).trim_end());
        let text = format!("{first} Második mondat.");
        let paragraphs = vec![CleanParagraph::prose(text)];
        assert_eq!(pick_lead(&paragraphs), first);
    }

    #[test]
    fn test_custom_cap() {
        let paragraphs = vec![CleanParagraph::prose("Első mondat. Második mondat. Harmadik.")];
        assert_eq!(pick_lead_with_cap(&paragraphs, 5), "Első mondat.");
        assert_eq!(pick_lead_with_cap(&paragraphs, 500), "Első mondat. Második mondat.");
    }

    #[test]
    fn test_unterminated_paragraph() {
        let paragraphs = vec![CleanParagraph::prose("Nincs mondatvégi írásjel")];
        assert_eq!(pick_lead(&paragraphs), "Nincs mondatvégi írásjel");
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pick_lead_never_panics(
                paragraphs in proptest::collection::vec((any::<String>(), any::<bool>()), 0..6),
                cap in 0usize..400,
            ) {
                let paragraphs: Vec<CleanParagraph> = paragraphs
                    .into_iter()
                    .map(|(text, is_list_item)| CleanParagraph { text, is_list_item })
                    .collect();

                let lead = pick_lead_with_cap(&paragraphs, cap);
                prop_assert_eq!(lead.trim(), lead.as_str());
                if paragraphs.is_empty() {
                    prop_assert!(lead.is_empty());
                }
            }
        }
    }
}
