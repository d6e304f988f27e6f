use super::boolean::BooleanExpression;
use super::expression::{Expression, IntoExpression};
use super::function::FunctionExpression;

/// How `search_document_for` interprets its query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    Basic,
    Semantic,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Basic => "basic",
            SearchMode::Semantic => "semantic",
        }
    }
}

/// Matches documents against a full-text query.
///
/// The mode is only sent when it differs from [`SearchMode::Basic`].
pub fn search_document_for(query: impl IntoExpression, mode: SearchMode) -> BooleanExpression {
    let mut args = vec![query.into_expression()];
    if mode != SearchMode::Basic {
        args.push(mode.as_str().into_expression());
    }
    BooleanExpression::call("search_document_for", args)
}

/// Relevance of the current document to the enclosing search.
pub fn topicality_score() -> FunctionExpression {
    FunctionExpression::new("topicality_score", Vec::<Expression>::new())
}

/// A highlighted excerpt of the document matching `query`.
pub fn document_snippet(query: impl IntoExpression) -> FunctionExpression {
    FunctionExpression::new("document_snippet", [query.into_expression()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_mode_is_implicit() {
        let basic = search_document_for("waffles", SearchMode::Basic);
        assert_eq!(basic.expression().as_function().unwrap().args().len(), 1);

        let semantic = search_document_for("waffles", SearchMode::Semantic);
        let args = semantic.expression().as_function().unwrap().args().to_vec();
        assert_eq!(args[1], "semantic".into_expression());
    }

    #[test]
    fn snippet_and_score_names() {
        assert_eq!(topicality_score().name(), "topicality_score");
        assert_eq!(document_snippet("x").args().len(), 1);
    }
}
