//! Boolean queries in Reverse Polish Notation.
//!
//! A query is a whitespace-separated token stream, e.g. `cat bird OR dog NOT`.
//! Terms push their postings, `AND`/`OR` combine the two topmost operands and
//! `NOT` behaves as "AND NOT": it negates either the term that follows it or
//! the top of the stack, then intersects with whatever precedes it.

use crate::index::{FrozenIndex, InvertedIndex};
use crate::merge::{complement, intersect, union};
use crate::DocId;
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Malformed-query errors. None of them touch index state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("insufficient operands for {operator}: need 2, found {found}")]
    InsufficientOperands { operator: Token, found: usize },

    #[error("NOT without operand")]
    MissingNotOperand,

    #[error("malformed expression (stack size: {depth})")]
    MalformedExpression { depth: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Term(String),
    And,
    Or,
    Not,
}

impl Token {
    /// Operators are matched case-sensitively; anything else is a term.
    pub fn classify(raw: &str) -> Token {
        match raw {
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            term => Token::Term(term.to_string()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Term(term) => f.write_str(term),
            Token::And => f.write_str("AND"),
            Token::Or => f.write_str("OR"),
            Token::Not => f.write_str("NOT"),
        }
    }
}

pub fn tokenize_query(query: &str) -> Vec<Token> {
    query.split_whitespace().map(Token::classify).collect()
}

/// Read access the evaluator needs from an index.
pub trait PostingsSource {
    fn postings(&self, term: &str) -> &[DocId];
    fn collection_size(&self) -> usize;
    fn original_doc_id(&self, internal_id: DocId) -> Option<&str>;
}

impl PostingsSource for InvertedIndex {
    fn postings(&self, term: &str) -> &[DocId] { InvertedIndex::postings(self, term) }
    fn collection_size(&self) -> usize { InvertedIndex::collection_size(self) }
    fn original_doc_id(&self, internal_id: DocId) -> Option<&str> {
        InvertedIndex::original_doc_id(self, internal_id)
    }
}

impl PostingsSource for FrozenIndex {
    fn postings(&self, term: &str) -> &[DocId] { InvertedIndex::postings(self, term) }
    fn collection_size(&self) -> usize { InvertedIndex::collection_size(self) }
    fn original_doc_id(&self, internal_id: DocId) -> Option<&str> {
        InvertedIndex::original_doc_id(self, internal_id)
    }
}

/// Evaluates RPN queries against a borrowed index.
pub struct BooleanRetrieval<'a, S: PostingsSource + ?Sized> {
    index: &'a S,
}

impl<'a, S: PostingsSource + ?Sized> BooleanRetrieval<'a, S> {
    pub fn new(index: &'a S) -> Self { Self { index } }

    /// Evaluate `query` and return matching internal ids in ascending order.
    pub fn process_query(&self, query: &str) -> Result<Vec<DocId>, QueryError> {
        let index = self.index;
        let tokens = tokenize_query(query);
        // Postings are borrowed from the index until a merge produces a new list.
        let mut stack: Vec<Cow<'a, [DocId]>> = Vec::new();
        let mut tokens = tokens.into_iter().peekable();

        while let Some(token) = tokens.next() {
            match token {
                Token::Term(term) => stack.push(Cow::Borrowed(index.postings(&term))),
                Token::And | Token::Or => {
                    if stack.len() < 2 {
                        return Err(QueryError::InsufficientOperands {
                            operator: token,
                            found: stack.len(),
                        });
                    }
                    let op2 = stack.pop().unwrap_or_default();
                    let op1 = stack.pop().unwrap_or_default();
                    let merged = match token {
                        Token::And => intersect(&op1, &op2),
                        _ => union(&op1, &op2),
                    };
                    stack.push(Cow::Owned(merged));
                }
                Token::Not => {
                    // Anything but AND/OR after NOT is read as the term to negate,
                    // including a second NOT.
                    let negated = match tokens.next_if(|t| !matches!(t, Token::And | Token::Or)) {
                        Some(next) => self.negate(index.postings(&next.to_string())),
                        None => {
                            let operand = stack.pop().ok_or(QueryError::MissingNotOperand)?;
                            self.negate(&operand)
                        }
                    };
                    let combined = match stack.pop() {
                        Some(previous) => intersect(&previous, &negated),
                        None => negated,
                    };
                    stack.push(Cow::Owned(combined));
                }
            }
        }

        match stack.len() {
            1 => Ok(stack.pop().map(Cow::into_owned).unwrap_or_default()),
            depth => Err(QueryError::MalformedExpression { depth }),
        }
    }

    fn negate(&self, postings: &[DocId]) -> Vec<DocId> {
        complement(postings, self.index.collection_size())
    }

    /// Like [`process_query`](Self::process_query), with ids mapped to external ids.
    /// Ids that fail to resolve are dropped.
    pub fn try_retrieve(&self, query: &str) -> Result<Vec<String>, QueryError> {
        let internal = self.process_query(query)?;
        Ok(internal
            .into_iter()
            .filter_map(|id| self.index.original_doc_id(id).map(str::to_string))
            .collect())
    }

    /// External ids matching `query`; a malformed query yields an empty result.
    pub fn retrieve(&self, query: &str) -> Vec<String> {
        self.try_retrieve(query).unwrap_or_else(|e| {
            tracing::warn!(query, error = %e, "query error");
            Vec::new()
        })
    }

    /// Internal ids matching `query`; a malformed query yields an empty result.
    pub fn retrieve_raw(&self, query: &str) -> Vec<DocId> {
        self.process_query(query).unwrap_or_else(|e| {
            tracing::warn!(query, error = %e, "query error");
            Vec::new()
        })
    }
}
