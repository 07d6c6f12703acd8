use crate::token::{Span, Token, TokenKind};
use crate::{CLOSE_TAG, ESCAPE, TAG_END, TAG_START};

/// Receives the tokens matched by the first pass.
///
/// Collecting into a list is one use; the pre-processor implements this trait
/// to rebuild a string while it scans.
pub trait MatchedTokenConsumer {
    fn accept(&mut self, span: Span, kind: TokenKind);
}

/// Collects first-pass tokens into a list. Tag tokens have no children yet.
#[derive(Debug, Default)]
pub struct TokenCollector {
    tokens: Vec<Token>,
}

impl TokenCollector {
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl MatchedTokenConsumer for TokenCollector {
    fn accept(&mut self, span: Span, kind: TokenKind) {
        self.tokens.push(Token::new(kind, span));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Tag,
    String,
}

/// Scan a message, reporting every text and tag token to `consumer`.
///
/// Never loses input: an unterminated `<` is reclassified as text and the
/// scan resumes right after it.
pub fn scan<C: MatchedTokenConsumer + ?Sized>(message: &str, lenient: bool, consumer: &mut C) {
    Scanner::new(message, lenient).run(consumer);
}

/// First-pass scanner state.
///
/// Walks the message one `char` at a time, tracking whether it is in plain
/// text, inside a tag candidate, or inside a quoted tag argument.
struct Scanner<'a> {
    message: &'a str,
    lenient: bool,
    pos: usize,
    state: State,
    escaped: bool,
    /// Start of the current tag candidate.
    marker: usize,
    quote: char,
    /// End of the last emitted token.
    token_end: usize,
    emitted: bool,
    warned_legacy: bool,
}

impl<'a> Scanner<'a> {
    fn new(message: &'a str, lenient: bool) -> Self {
        Self {
            message,
            lenient,
            pos: 0,
            state: State::Normal,
            escaped: false,
            marker: 0,
            quote: '\0',
            token_end: 0,
            emitted: false,
            warned_legacy: false,
        }
    }

    fn run<C: MatchedTokenConsumer + ?Sized>(mut self, consumer: &mut C) {
        while let Some(c) = self.char_at(self.pos) {
            let i = self.pos;
            self.pos += c.len_utf8();

            if !self.lenient {
                self.check_legacy_code(c, i);
            }

            if self.escaped {
                self.escaped = false;
                continue;
            }

            if c == ESCAPE {
                if let Some(next) = self.char_at(self.pos) {
                    self.escaped = match self.state {
                        State::Normal => next == TAG_START || next == ESCAPE,
                        State::String => next == self.quote || next == ESCAPE,
                        // escapes can't be part of a tag name, so this was never a tag
                        State::Tag if next == TAG_START => {
                            self.state = State::Normal;
                            true
                        }
                        State::Tag => false,
                    };
                    if self.escaped {
                        continue;
                    }
                }
            }

            match self.state {
                State::Normal => {
                    if c == TAG_START {
                        self.marker = i;
                        self.state = State::Tag;
                    }
                }
                State::Tag => match c {
                    TAG_END => self.close_candidate(i, consumer),
                    TAG_START => self.marker = i,
                    '\'' | '"' => {
                        self.quote = c;
                        // only a real string if the quote is closed somewhere
                        if self.message[self.pos..].contains(c) {
                            self.state = State::String;
                        }
                    }
                    _ => {}
                },
                State::String => {
                    if c == self.quote {
                        self.state = State::Tag;
                    }
                }
            }

            if self.pos == self.message.len() && self.state == State::Tag {
                // Unmatched `<` at end of input: rescan everything after it as text,
                // quoted sections may still hold real tags.
                self.pos = self.marker + TAG_START.len_utf8();
                self.state = State::Normal;
            }
        }

        let len = self.message.len();
        if !self.emitted {
            consumer.accept(Span::new(0, len), TokenKind::Text);
        } else if self.token_end != len {
            consumer.accept(Span::new(self.token_end, len), TokenKind::Text);
        }
    }

    /// Handle a `>` while inside a tag candidate.
    fn close_candidate<C: MatchedTokenConsumer + ?Sized>(&mut self, i: usize, consumer: &mut C) {
        self.state = State::Normal;
        if i == self.marker + 1 {
            // `<>` is not a tag
            return;
        }

        if self.token_end != self.marker {
            consumer.accept(Span::new(self.token_end, self.marker), TokenKind::Text);
        }
        self.token_end = self.pos;
        self.emitted = true;

        let bytes = self.message.as_bytes();
        let kind = if self.marker + 1 < bytes.len() && bytes[self.marker + 1] == CLOSE_TAG as u8 {
            TokenKind::CloseTag
        } else if self.marker + 2 < bytes.len() && bytes[i - 1] == CLOSE_TAG as u8 {
            TokenKind::OpenCloseTag
        } else {
            TokenKind::OpenTag
        };
        consumer.accept(Span::new(self.marker, self.pos), kind);
    }

    fn check_legacy_code(&mut self, c: char, i: usize) {
        if c != '§' || self.warned_legacy {
            return;
        }
        let is_code = self.char_at(self.pos).is_some_and(|next| {
            matches!(next.to_ascii_lowercase(), '0'..='9' | 'a'..='f' | 'k'..='o' | 'r')
        });
        if is_code {
            self.warned_legacy = true;
            log::warn!(
                "legacy formatting code at byte {i} is not supported and will be kept as text"
            );
        }
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.message[pos..].chars().next()
    }
}
