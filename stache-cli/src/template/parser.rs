//! Template source to node tree
//!
//! Scanning happens one character at a time so that whitespace on a line
//! holding only section, comment, partial or delimiter tags can be dropped
//! together with its newline once the line ends.

use super::TemplateError;

/// Parsed template element
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Node {
    Text(String),
    Variable {
        name: String,
        escape: bool,
    },
    Section {
        name: String,
        inverted: bool,
        children: Vec<Node>,
    },
    Partial {
        name: String,
        indent: String,
        indent_first_line: bool,
    },
}

#[derive(Debug)]
enum Token {
    Text(char),
    Variable {
        name: String,
        escape: bool,
    },
    Open {
        name: String,
        inverted: bool,
        line: usize,
    },
    Close {
        name: String,
        line: usize,
    },
    Partial {
        name: String,
        indent: String,
        indent_first_line: bool,
    },
}

pub(super) fn parse(source: &str) -> Result<Vec<Node>, TemplateError> {
    let mut scanner = Scanner::new(source);
    scanner.run()?;
    nest(scanner.tokens.into_iter().flatten())
}

struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    open: String,
    close: String,
    tokens: Vec<Option<Token>>,
    // Indices of whitespace tokens on the current line
    spaces: Vec<usize>,
    has_tag: bool,
    non_space: bool,
    indentation: String,
    tag_index: usize,
    line_has_non_space: bool,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            open: "{{".to_string(),
            close: "}}".to_string(),
            tokens: Vec::new(),
            spaces: Vec::new(),
            has_tag: false,
            non_space: false,
            indentation: String::new(),
            tag_index: 0,
            line_has_non_space: false,
        }
    }

    fn run(&mut self) -> Result<(), TemplateError> {
        let source = self.source;
        while self.pos < source.len() {
            let rest = &source[self.pos..];
            let text_len = rest.find(self.open.as_str()).unwrap_or(rest.len());
            for ch in rest[..text_len].chars() {
                self.push_char(ch);
            }
            self.pos += text_len;

            if self.pos < source.len() {
                self.tag()?;
            }
        }
        self.strip_space();
        Ok(())
    }

    fn push_char(&mut self, ch: char) {
        if ch.is_whitespace() {
            self.spaces.push(self.tokens.len());
            self.indentation.push(ch);
        } else {
            self.non_space = true;
            self.line_has_non_space = true;
            self.indentation.push(' ');
        }
        self.tokens.push(Some(Token::Text(ch)));

        if ch == '\n' {
            self.strip_space();
            self.indentation.clear();
            self.tag_index = 0;
            self.line_has_non_space = false;
        }
    }

    /// Drop the line's whitespace if it held only standalone tags
    fn strip_space(&mut self) {
        if self.has_tag && !self.non_space {
            for index in self.spaces.drain(..) {
                self.tokens[index] = None;
            }
        } else {
            self.spaces.clear();
        }
        self.has_tag = false;
        self.non_space = false;
    }

    fn tag(&mut self) -> Result<(), TemplateError> {
        let source = self.source;
        let line = line_at(source, self.pos);
        self.pos += self.open.len();
        self.has_tag = true;

        let kind = source[self.pos..]
            .chars()
            .next()
            .filter(|c| "#^/>{&=!".contains(*c));
        if let Some(c) = kind {
            self.pos += c.len_utf8();
        }
        self.skip_whitespace();

        let closing = if kind == Some('{') {
            ["}", self.close.as_str()].concat()
        } else {
            self.close.clone()
        };
        let value = self.take_until(&closing, line)?;

        let token = match kind {
            None => {
                self.non_space = true;
                Some(Token::Variable {
                    name: value,
                    escape: true,
                })
            }
            Some('{' | '&') => {
                self.non_space = true;
                Some(Token::Variable {
                    name: value,
                    escape: false,
                })
            }
            Some('#') => Some(Token::Open {
                name: value,
                inverted: false,
                line,
            }),
            Some('^') => Some(Token::Open {
                name: value,
                inverted: true,
                line,
            }),
            Some('/') => Some(Token::Close { name: value, line }),
            Some('>') => Some(self.partial(value)),
            Some('=') => {
                self.set_delimiters(&value, line)?;
                None
            }
            // comment
            Some(_) => None,
        };

        if let Some(token) = token {
            self.tokens.push(Some(token));
        }
        self.tag_index += 1;
        Ok(())
    }

    fn partial(&self, name: String) -> Token {
        let indent = if self.tag_index == 0 {
            self.indentation
                .chars()
                .filter(|c| matches!(c, ' ' | '\t'))
                .collect()
        } else {
            String::new()
        };

        Token::Partial {
            name,
            indent,
            indent_first_line: !self.line_has_non_space,
        }
    }

    fn set_delimiters(&mut self, value: &str, line: usize) -> Result<(), TemplateError> {
        let invalid = || TemplateError::InvalidDelimiters {
            spec: value.to_string(),
            line,
        };

        let spec = value.strip_suffix('=').ok_or_else(invalid)?;
        let mut parts = spec.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(open), Some(close), None) => {
                self.open = open.to_string();
                self.close = close.to_string();
                Ok(())
            }
            _ => Err(invalid()),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.source[self.pos..];
        let skipped = rest.len() - rest.trim_start().len();
        self.pos += skipped;
    }

    fn take_until(&mut self, closing: &str, line: usize) -> Result<String, TemplateError> {
        let source = self.source;
        let rest = &source[self.pos..];
        let end = rest
            .find(closing)
            .ok_or(TemplateError::UnclosedTag { line })?;
        self.pos += end + closing.len();
        Ok(rest[..end].trim_end().to_string())
    }
}

fn line_at(source: &str, pos: usize) -> usize {
    source[..pos].matches('\n').count() + 1
}

struct Frame {
    name: String,
    inverted: bool,
    line: usize,
    parent: Vec<Node>,
}

fn nest(tokens: impl IntoIterator<Item = Token>) -> Result<Vec<Node>, TemplateError> {
    let mut frames: Vec<Frame> = Vec::new();
    let mut nodes = Vec::new();

    for token in tokens {
        match token {
            Token::Text(ch) => {
                if let Some(Node::Text(text)) = nodes.last_mut() {
                    text.push(ch);
                } else {
                    nodes.push(Node::Text(ch.to_string()));
                }
            }
            Token::Variable { name, escape } => nodes.push(Node::Variable { name, escape }),
            Token::Partial {
                name,
                indent,
                indent_first_line,
            } => nodes.push(Node::Partial {
                name,
                indent,
                indent_first_line,
            }),
            Token::Open {
                name,
                inverted,
                line,
            } => frames.push(Frame {
                name,
                inverted,
                line,
                parent: std::mem::take(&mut nodes),
            }),
            Token::Close { name, line } => {
                let Some(frame) = frames.pop() else {
                    return Err(TemplateError::UnopenedSection { name, line });
                };
                if frame.name != name {
                    return Err(TemplateError::MismatchedSection {
                        open: frame.name,
                        close: name,
                        line,
                    });
                }

                let children = std::mem::replace(&mut nodes, frame.parent);
                nodes.push(Node::Section {
                    name,
                    inverted: frame.inverted,
                    children,
                });
            }
        }
    }

    match frames.pop() {
        Some(frame) => Err(TemplateError::UnclosedSection {
            name: frame.name,
            line: frame.line,
        }),
        None => Ok(nodes),
    }
}
