//! Rule-based task classification for user prompts.
//!
//! Decides which capability a message should invoke before any model is
//! called: a fixed, ordered pattern table is scanned top to bottom and the
//! first matching rule wins. Order is a product decision — specific intents
//! (games, apps, images) sit above broad catch-alls (reasoning question
//! forms), with plain chat as the fallback. An attached image always routes
//! to Vision regardless of text.

use regex::Regex;
use serde::Serialize;
use shared::task::TaskCategory;
use std::sync::LazyLock;

/// Routing decision for one message. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub category: TaskCategory,
    pub model: &'static str,
    pub badge: &'static str,
}

impl ClassificationResult {
    fn for_category(category: TaskCategory) -> Self {
        Self {
            category,
            model: model_for(category),
            badge: badge_for(category),
        }
    }
}

struct Rule {
    category: TaskCategory,
    patterns: Vec<Regex>,
}

fn compile(category: TaskCategory, patterns: &[&str]) -> Rule {
    Rule {
        category,
        patterns: patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).expect("invalid classifier pattern"))
            .collect(),
    }
}

// Priority table. Keep the rule order intact: GameBuild before AppBuild
// before ImageGen before Code before Research before Reasoning before
// Creative, with Chat as the fallback.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        compile(
            TaskCategory::GameBuild,
            &[
                r"\b(build|create|make|generate|develop)\s+(a\s+)?(3d\s+)?game\b",
                r"\b(three\.js|babylon\.js|threejs|babylonjs)\b",
                r"\b(2d|3d)\s+game\b",
                r"\bgame\s+(with|using|in)\b",
            ],
        ),
        compile(
            TaskCategory::AppBuild,
            &[
                r"\b(build|create|make|generate|develop)\s+(a\s+)?(web\s+)?(app|application|website|webpage|site|tool|dashboard|calculator|todo|form)\b",
                r"\b(html|css|javascript)\s+(app|page|website|template)\b",
                r"\bcreate\s+an?\s+app\b",
                r"\bmake\s+a\s+website\b",
                r"\bbuild\s+me\s+a\b",
            ],
        ),
        compile(
            TaskCategory::ImageGen,
            &[
                r"\b(generate|create|draw|make|produce|render)\s+(an?\s+)?(image|picture|photo|illustration|artwork|painting|drawing|portrait|landscape)\b",
                r"\bimage\s+of\b",
                r"\bpicture\s+of\b",
                r"\bdraw\s+(me\s+)?(a|an)\b",
                r"\bvisual(ize|ization)?\b",
            ],
        ),
        compile(
            TaskCategory::Code,
            &[
                r"\b(write|fix|debug|explain|optimize|refactor|review|analyze)\s+(this\s+)?(code|function|script|program|algorithm|class|method|bug|error)\b",
                r"\b(python|javascript|typescript|java|c\+\+|rust|go|ruby|php|swift|kotlin|sql|bash|shell)\s+(code|script|function|program)\b",
                r"\bcode\s+(for|to|that|which)\b",
                r"\bscript\s+(to|for|that)\b",
                r"\bfunction\s+(to|for|that)\b",
                r"\bapi\s+(endpoint|route|call)\b",
                r"\b(implement|program)\s+(a|an|the)\b",
            ],
        ),
        compile(
            TaskCategory::Research,
            &[
                r"\b(analyze|analyse|research|investigate|compare|evaluate|assess|examine)\b",
                r"\b(what\s+is\s+the\s+difference|pros\s+and\s+cons|advantages\s+and\s+disadvantages)\b",
                r"\b(summarize|summarise|summary\s+of)\b",
                r"\b(explain\s+in\s+detail|deep\s+dive|comprehensive)\b",
                r"\b(latest|recent|current)\s+(news|research|developments|trends)\b",
                r"\bsearch\s+for\b",
            ],
        ),
        compile(
            TaskCategory::Reasoning,
            &[
                r"\b(solve|calculate|compute|prove|derive|reason|logic|math|equation|formula)\b",
                r"\b(step\s+by\s+step|step-by-step|think\s+through|work\s+out)\b",
                r"\b(complex|difficult|hard|challenging)\s+(problem|question|task)\b",
                r"\b(why|how)\s+(does|do|is|are|can|could|would|should)\b",
            ],
        ),
        compile(
            TaskCategory::Creative,
            &[
                r"\b(write|create|compose|draft|generate)\s+(a\s+)?(story|poem|essay|article|blog|email|letter|script|song|lyrics|novel|fiction|narrative|creative)\b",
                r"\b(creative\s+writing|storytelling|copywriting)\b",
                r"\b(social\s+media\s+post|tweet|caption|ad\s+copy|marketing)\b",
                r"\b(rhyme|haiku|sonnet|limerick)\b",
            ],
        ),
    ]
});

/// Which model serves each category.
pub fn model_for(category: TaskCategory) -> &'static str {
    match category {
        TaskCategory::Chat => "gpt-4o",
        TaskCategory::Reasoning => "claude-opus-4-5",
        TaskCategory::Code => "deepseek-chat",
        TaskCategory::AppBuild => "gpt-4o",
        TaskCategory::GameBuild => "gpt-4o",
        TaskCategory::ImageGen => "dall-e-3",
        TaskCategory::Vision => "gpt-4o",
        TaskCategory::Creative => "claude-sonnet-4-5",
        TaskCategory::Research => "gpt-4o",
    }
}

/// Stable badge style id for each category, resolved to colors by the UI.
pub fn badge_for(category: TaskCategory) -> &'static str {
    match category {
        TaskCategory::Chat => "badge-blue",
        TaskCategory::Reasoning => "badge-amber",
        TaskCategory::Code => "badge-emerald",
        TaskCategory::AppBuild => "badge-cyan",
        TaskCategory::GameBuild => "badge-pink",
        TaskCategory::ImageGen => "badge-purple",
        TaskCategory::Vision => "badge-orange",
        TaskCategory::Creative => "badge-rose",
        TaskCategory::Research => "badge-teal",
    }
}

/// Classify a message. Total over any input; an attached image forces
/// Vision, no pattern match falls back to Chat.
pub fn classify(message: &str, has_image: bool) -> ClassificationResult {
    if has_image {
        return ClassificationResult::for_category(TaskCategory::Vision);
    }

    for rule in RULES.iter() {
        if rule.patterns.iter().any(|p| p.is_match(message)) {
            return ClassificationResult::for_category(rule.category);
        }
    }

    ClassificationResult::for_category(TaskCategory::Chat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_forces_vision() {
        assert_eq!(classify("", true).category, TaskCategory::Vision);
        assert_eq!(
            classify("build me a 3d game", true).category,
            TaskCategory::Vision
        );
    }

    #[test]
    fn test_unmatched_text_falls_back_to_chat() {
        assert_eq!(classify("hello there", false).category, TaskCategory::Chat);
        assert_eq!(classify("", false).category, TaskCategory::Chat);
    }

    #[test]
    fn test_game_build_outranks_app_build() {
        // Matches both a game phrase and "build me a"; the game rule sits
        // higher in the table and must win.
        let result = classify("build me a 3D game app", false);
        assert_eq!(result.category, TaskCategory::GameBuild);
    }

    #[test]
    fn test_app_build_phrases() {
        assert_eq!(
            classify("make a website for my bakery", false).category,
            TaskCategory::AppBuild
        );
        assert_eq!(
            classify("build me a calculator", false).category,
            TaskCategory::AppBuild
        );
    }

    #[test]
    fn test_image_gen_phrases() {
        assert_eq!(
            classify("draw me a portrait of a cat", false).category,
            TaskCategory::ImageGen
        );
        assert_eq!(
            classify("generate an image of a sunset", false).category,
            TaskCategory::ImageGen
        );
    }

    #[test]
    fn test_code_phrases() {
        assert_eq!(
            classify("fix this bug in my parser", false).category,
            TaskCategory::Code
        );
        assert_eq!(
            classify("write a python script to rename files", false).category,
            TaskCategory::Code
        );
    }

    #[test]
    fn test_research_before_reasoning() {
        // "compare" (Research) and "why does" (Reasoning) both match;
        // Research is evaluated first.
        assert_eq!(
            classify("compare why does rust beat c", false).category,
            TaskCategory::Research
        );
    }

    #[test]
    fn test_reasoning_question_forms() {
        assert_eq!(
            classify("why does the sky look blue at noon", false).category,
            TaskCategory::Reasoning
        );
        assert_eq!(
            classify("solve this equation", false).category,
            TaskCategory::Reasoning
        );
    }

    #[test]
    fn test_creative_phrases() {
        assert_eq!(
            classify("write a poem about autumn", false).category,
            TaskCategory::Creative
        );
        assert_eq!(
            classify("give it a haiku form", false).category,
            TaskCategory::Creative
        );
    }

    #[test]
    fn test_word_boundaries_respected() {
        // "research" inside another word must not trigger the Research rule.
        assert_eq!(
            classify("my unresearchable feelings", false).category,
            TaskCategory::Chat
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            classify("BUILD ME A WEBSITE", false).category,
            TaskCategory::AppBuild
        );
    }

    #[test]
    fn test_every_category_has_model_and_badge() {
        for category in TaskCategory::all() {
            assert!(!model_for(*category).is_empty());
            assert!(!badge_for(*category).is_empty());
        }
    }
}
