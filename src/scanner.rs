//! JavaScript source scanner
//!
//! Produces the syntax tree consumed by the evaluator. The scan is a single
//! forward pass: strings, comments and regex literals are consumed whole,
//! and the token patterns the built-in rules care about (declarations,
//! require calls, `new` expressions, braces, object keys) are emitted as
//! nodes in source order.

use crate::tree::{BraceOwner, DeclKeyword, InitKind, NodeData, SyntaxNode, Tree};
use thiserror::Error;

/// Error during scanning
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unterminated string literal at line {line}")]
    UnterminatedString { line: usize },

    #[error("unterminated block comment at line {line}")]
    UnterminatedComment { line: usize },

    #[error("unexpected '}}' at line {line}")]
    UnexpectedCloseBrace { line: usize },
}

impl ParseError {
    /// Line the failure was detected on
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnterminatedString { line }
            | ParseError::UnterminatedComment { line }
            | ParseError::UnexpectedCloseBrace { line } => *line,
        }
    }
}

/// A source comment, kept for suppression directives
#[derive(Debug, Clone)]
pub struct Comment {
    pub line: usize,
    pub text: String,
}

/// Scan output: the tree plus the comments encountered
#[derive(Debug)]
pub struct ScanOutput {
    pub tree: Tree,
    pub comments: Vec<Comment>,
}

/// Scan JavaScript source into a tree of nodes
pub fn scan(content: &str) -> Result<ScanOutput, ParseError> {
    let mut scanner = Scanner::new(content);
    scanner.run()?;
    Ok(ScanOutput {
        tree: Tree::new(scanner.nodes),
        comments: scanner.comments,
    })
}

/// Last significant token, for brace/regex disambiguation
#[derive(Debug, Clone, PartialEq, Eq)]
enum Prev {
    None,
    Ident(String),
    Punct(u8),
    Arrow,
    Str,
    Num,
}

/// Declaration recognition state
#[derive(Debug, Clone, PartialEq, Eq)]
enum DeclState {
    Idle,
    /// Saw `var`/`let`/`const`, waiting for the declarator name
    ExpectName { kw: DeclKeyword },
    /// Have the name, waiting for `=`, `,` or the end of the declarator
    AfterName {
        kw: DeclKeyword,
        name: String,
        line: usize,
        column: usize,
    },
    /// Saw `=`, the next token classifies the initializer
    AwaitInit {
        kw: DeclKeyword,
        name: String,
        line: usize,
        column: usize,
    },
    /// Initializer is `new ...` or `require(...)`; finalized once the
    /// callee/module is known
    InitPending {
        kw: DeclKeyword,
        name: String,
        line: usize,
        column: usize,
        what: PendingInit,
    },
    /// Declarator emitted; a `,` at the right depth starts the next one
    Active { kw: DeclKeyword },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingInit {
    New,
    Require,
}

/// An open brace frame
struct Frame {
    /// Emitted node index (None for plain blocks)
    node: Option<usize>,
    is_object: bool,
    expect_key: bool,
    paren_depth: usize,
    bracket_depth: usize,
}

struct Scanner<'a> {
    bytes: &'a [u8],
    i: usize,
    line: usize,
    line_start: usize,

    nodes: Vec<SyntaxNode>,
    comments: Vec<Comment>,
    frames: Vec<Frame>,

    paren_depth: usize,
    bracket_depth: usize,
    prev: Prev,

    /// Control/function keyword awaiting its brace
    pending_keyword: Option<(String, usize)>,
    /// `new` awaiting its constructor name
    pending_new: bool,
    /// `require` awaiting `(`
    pending_require: Option<(usize, usize)>,
    /// `require(` awaiting the module string
    require_paren: Option<(usize, usize)>,

    decl: DeclState,
    decl_paren_depth: usize,
    decl_brace_depth: usize,

    /// Whether the current run of statements is still a require block
    require_block_open: bool,
}

impl<'a> Scanner<'a> {
    fn new(content: &'a str) -> Self {
        let nodes = vec![SyntaxNode {
            line: 1,
            column: 1,
            parent: None,
            data: NodeData::Program,
        }];

        Self {
            bytes: content.as_bytes(),
            i: 0,
            line: 1,
            line_start: 0,
            nodes,
            comments: Vec::new(),
            frames: Vec::new(),
            paren_depth: 0,
            bracket_depth: 0,
            prev: Prev::None,
            pending_keyword: None,
            pending_new: false,
            pending_require: None,
            require_paren: None,
            decl: DeclState::Idle,
            decl_paren_depth: 0,
            decl_brace_depth: 0,
            require_block_open: false,
        }
    }

    fn col(&self, pos: usize) -> usize {
        pos - self.line_start + 1
    }

    fn parent_idx(&self) -> Option<usize> {
        self.frames.iter().rev().find_map(|f| f.node).or(Some(0))
    }

    fn emit(&mut self, line: usize, column: usize, data: NodeData) -> usize {
        let parent = self.parent_idx();
        self.nodes.push(SyntaxNode {
            line,
            column,
            parent,
            data,
        });
        self.nodes.len() - 1
    }

    /// Anything that is not part of a require statement ends the block
    fn note_block_break(&mut self) {
        self.require_block_open = false;
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while self.i < self.bytes.len() {
            let c = self.bytes[self.i];
            match c {
                b'\n' => {
                    self.i += 1;
                    self.line += 1;
                    self.line_start = self.i;
                }
                b' ' | b'\t' | b'\r' => self.i += 1,
                b'/' => self.on_slash()?,
                b'\'' | b'"' => self.on_string(c)?,
                b'`' => self.on_template()?,
                b'{' => self.on_open_brace(),
                b'}' => self.on_close_brace()?,
                b'0'..=b'9' => self.on_number(),
                c if is_ident_start(c) => self.on_word(),
                _ => self.on_punct(c),
            }
        }

        // Declarator left hanging at EOF
        self.close_declarator(InitKind::Other);
        Ok(())
    }

    fn finalize_decl(
        &mut self,
        kw: DeclKeyword,
        name: String,
        line: usize,
        column: usize,
        init: InitKind,
    ) {
        let is_require = matches!(init, InitKind::Require(_));
        self.emit(
            line,
            column,
            NodeData::Declaration {
                keyword: kw,
                name,
                init,
            },
        );
        if !is_require {
            self.note_block_break();
        }
        self.decl = DeclState::Active { kw };
    }

    /// End the current declarator (at `,`, `;`, EOF or a foreign token)
    fn close_declarator(&mut self, init_for_pending: InitKind) {
        match std::mem::replace(&mut self.decl, DeclState::Idle) {
            DeclState::AfterName {
                kw,
                name,
                line,
                column,
            } => {
                self.finalize_decl(kw, name, line, column, InitKind::None);
            }
            DeclState::AwaitInit {
                kw,
                name,
                line,
                column,
            }
            | DeclState::InitPending {
                kw,
                name,
                line,
                column,
                ..
            } => {
                self.finalize_decl(kw, name, line, column, init_for_pending);
            }
            other => self.decl = other,
        }
    }

    /// Finalize an AwaitInit declarator with a classified initializer
    fn classify_init(&mut self, init: InitKind) {
        if let DeclState::AwaitInit {
            kw,
            name,
            line,
            column,
        } = self.decl.clone()
        {
            self.finalize_decl(kw, name, line, column, init);
        }
    }

    fn peek_non_ws(&self, mut pos: usize) -> Option<u8> {
        while pos < self.bytes.len() {
            match self.bytes[pos] {
                b' ' | b'\t' | b'\r' | b'\n' => pos += 1,
                c => return Some(c),
            }
        }
        None
    }

    /// Emit an object key if the cursor sits at a key position
    fn try_object_key(&mut self, key: &str, line: usize, column: usize) -> bool {
        let literal = match self.frames.last() {
            Some(f)
                if f.is_object && f.expect_key && self.peek_non_ws(self.i) == Some(b':') =>
            {
                f.node.unwrap_or(0)
            }
            _ => return false,
        };
        if let Some(f) = self.frames.last_mut() {
            f.expect_key = false;
        }
        self.emit(
            line,
            column,
            NodeData::ObjectKey {
                key: key.to_string(),
                literal,
            },
        );
        true
    }

    fn on_word(&mut self) {
        let start = self.i;
        while self.i < self.bytes.len() && is_ident_continue(self.bytes[self.i]) {
            self.i += 1;
        }
        let word = std::str::from_utf8(&self.bytes[start..self.i])
            .unwrap_or("")
            .to_string();
        let line = self.line;
        let column = self.col(start);

        // A word is never the module string, so a dangling require(
        // pattern is broken here
        self.pending_require = None;
        self.require_paren = None;

        // Declarator name
        if let DeclState::ExpectName { kw } = self.decl.clone() {
            if !is_reserved(&word) {
                self.decl = DeclState::AfterName {
                    kw,
                    name: word.clone(),
                    line,
                    column,
                };
                self.prev = Prev::Ident(word);
                return;
            }
        }

        // Initializer classification
        if let DeclState::AwaitInit {
            kw,
            name,
            line: d_line,
            column: d_col,
        } = self.decl.clone()
        {
            match word.as_str() {
                "new" => {
                    self.decl = DeclState::InitPending {
                        kw,
                        name,
                        line: d_line,
                        column: d_col,
                        what: PendingInit::New,
                    };
                    self.pending_new = true;
                    self.prev = Prev::Ident(word);
                    return;
                }
                "require" => {
                    self.decl = DeclState::InitPending {
                        kw,
                        name,
                        line: d_line,
                        column: d_col,
                        what: PendingInit::Require,
                    };
                    self.pending_require = Some((line, column));
                    self.prev = Prev::Ident(word);
                    return;
                }
                "function" => {
                    self.finalize_decl(kw, name, d_line, d_col, InitKind::Function);
                    self.pending_keyword = Some((word.clone(), line));
                    self.prev = Prev::Ident(word);
                    return;
                }
                _ => {
                    self.finalize_decl(kw, name, d_line, d_col, InitKind::Other);
                    // fall through: the word may still be significant
                }
            }
        }

        match word.as_str() {
            "var" | "let" | "const" => {
                let kw = match word.as_str() {
                    "var" => DeclKeyword::Var,
                    "let" => DeclKeyword::Let,
                    _ => DeclKeyword::Const,
                };
                self.decl = DeclState::ExpectName { kw };
                self.decl_paren_depth = self.paren_depth;
                self.decl_brace_depth = self.frames.len();
            }
            "if" | "else" | "for" | "while" | "do" | "switch" | "try" | "catch" | "finally"
            | "function" => {
                self.pending_keyword = Some((word.clone(), line));
            }
            "new" => {
                self.pending_new = true;
            }
            "require" => {
                self.pending_require = Some((line, column));
            }
            _ => {
                // Constructor name after `new` (member chains keep waiting)
                if self.pending_new {
                    if self.peek_non_ws(self.i) == Some(b'.') {
                        self.prev = Prev::Ident(word);
                        return;
                    }
                    self.pending_new = false;
                    if let DeclState::InitPending {
                        kw,
                        name,
                        line: d_line,
                        column: d_col,
                        what: PendingInit::New,
                    } = self.decl.clone()
                    {
                        self.finalize_decl(kw, name, d_line, d_col, InitKind::New(word.clone()));
                    }
                    self.emit(
                        line,
                        column,
                        NodeData::NewExpr {
                            callee: word.clone(),
                        },
                    );
                    self.note_block_break();
                    self.prev = Prev::Ident(word);
                    return;
                }

                if self.try_object_key(&word, line, column) {
                    self.prev = Prev::Ident(word);
                    return;
                }

                // Plain identifier in statement position ends a require run
                self.note_block_break();
            }
        }

        self.prev = Prev::Ident(word);
    }

    fn on_number(&mut self) {
        self.classify_init(InitKind::Literal);
        while self.i < self.bytes.len()
            && (self.bytes[self.i].is_ascii_alphanumeric()
                || self.bytes[self.i] == b'.'
                || self.bytes[self.i] == b'_')
        {
            self.i += 1;
        }
        self.pending_require = None;
        self.require_paren = None;
        self.pending_new = false;
        self.prev = Prev::Num;
    }

    fn on_string(&mut self, quote: u8) -> Result<(), ParseError> {
        let start = self.i;
        let line = self.line;
        let column = self.col(start);
        self.i += 1;

        let mut value = String::new();
        let mut has_single = false;
        let mut escaped = false;
        loop {
            if self.i >= self.bytes.len() {
                return Err(ParseError::UnterminatedString { line });
            }
            let c = self.bytes[self.i];
            if escaped {
                if c == b'\n' {
                    self.line += 1;
                    self.line_start = self.i + 1;
                }
                value.push(c as char);
                escaped = false;
                self.i += 1;
                continue;
            }
            match c {
                b'\\' => {
                    value.push('\\');
                    escaped = true;
                    self.i += 1;
                }
                b'\n' => return Err(ParseError::UnterminatedString { line }),
                c if c == quote => {
                    self.i += 1;
                    break;
                }
                b'\'' => {
                    has_single = true;
                    value.push('\'');
                    self.i += 1;
                }
                c => {
                    value.push(c as char);
                    self.i += 1;
                }
            }
        }

        // A string directly after `require(` is the module name
        if let Some((r_line, r_col)) = self.require_paren.take() {
            if let DeclState::InitPending {
                kw,
                name,
                line: d_line,
                column: d_col,
                what: PendingInit::Require,
            } = self.decl.clone()
            {
                self.finalize_decl(kw, name, d_line, d_col, InitKind::Require(value.clone()));
            }
            let starts_block = !self.require_block_open;
            self.require_block_open = true;
            self.emit(
                r_line,
                r_col,
                NodeData::RequireCall {
                    module: value.clone(),
                    starts_block,
                },
            );
        } else {
            self.classify_init(InitKind::Literal);
        }
        self.pending_require = None;
        self.pending_new = false;

        self.emit(
            line,
            column,
            NodeData::StringLiteral {
                quote: quote as char,
                value: value.clone(),
                has_unescaped_single_quote: has_single,
            },
        );

        // Quoted object-literal key
        self.try_object_key(&value, line, column);

        self.prev = Prev::Str;
        Ok(())
    }

    fn on_template(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        self.i += 1;
        let mut escaped = false;
        loop {
            if self.i >= self.bytes.len() {
                return Err(ParseError::UnterminatedString { line });
            }
            let c = self.bytes[self.i];
            if escaped {
                escaped = false;
            } else {
                match c {
                    b'\\' => escaped = true,
                    b'`' => {
                        self.i += 1;
                        break;
                    }
                    _ => {}
                }
            }
            if c == b'\n' {
                self.line += 1;
                self.line_start = self.i + 1;
            }
            self.i += 1;
        }
        self.classify_init(InitKind::Literal);
        self.pending_require = None;
        self.require_paren = None;
        self.pending_new = false;
        self.prev = Prev::Str;
        Ok(())
    }

    fn on_slash(&mut self) -> Result<(), ParseError> {
        match self.bytes.get(self.i + 1).copied() {
            Some(b'/') => {
                let start = self.i;
                while self.i < self.bytes.len() && self.bytes[self.i] != b'\n' {
                    self.i += 1;
                }
                let text = String::from_utf8_lossy(&self.bytes[start..self.i]).to_string();
                self.comments.push(Comment {
                    line: self.line,
                    text,
                });
                Ok(())
            }
            Some(b'*') => {
                let line = self.line;
                let start = self.i;
                self.i += 2;
                loop {
                    if self.i + 1 >= self.bytes.len() {
                        return Err(ParseError::UnterminatedComment { line });
                    }
                    if self.bytes[self.i] == b'*' && self.bytes[self.i + 1] == b'/' {
                        self.i += 2;
                        break;
                    }
                    if self.bytes[self.i] == b'\n' {
                        self.line += 1;
                        self.line_start = self.i + 1;
                    }
                    self.i += 1;
                }
                let text = String::from_utf8_lossy(&self.bytes[start..self.i]).to_string();
                self.comments.push(Comment { line, text });
                Ok(())
            }
            _ => {
                if self.regex_can_start() {
                    if let Some(end) = self.scan_regex_end() {
                        self.i = end;
                        self.prev = Prev::Num;
                        return Ok(());
                    }
                }
                self.i += 1;
                self.prev = Prev::Punct(b'/');
                Ok(())
            }
        }
    }

    fn regex_can_start(&self) -> bool {
        match &self.prev {
            Prev::None | Prev::Arrow => true,
            Prev::Punct(c) => matches!(
                c,
                b'=' | b'(' | b',' | b':' | b'[' | b'!' | b'&' | b'|' | b'?' | b';' | b'{'
                    | b'}' | b'<' | b'>' | b'+' | b'-' | b'*' | b'%'
            ),
            Prev::Ident(w) => matches!(
                w.as_str(),
                "return" | "case" | "typeof" | "do" | "else" | "in" | "of" | "instanceof"
            ),
            _ => false,
        }
    }

    /// Lookahead for the end of a regex literal on the current line
    fn scan_regex_end(&self) -> Option<usize> {
        let mut pos = self.i + 1;
        let mut in_class = false;
        let mut escaped = false;
        while pos < self.bytes.len() {
            let c = self.bytes[pos];
            if escaped {
                escaped = false;
            } else {
                match c {
                    b'\\' => escaped = true,
                    b'\n' => return None,
                    b'[' => in_class = true,
                    b']' => in_class = false,
                    b'/' if !in_class => {
                        pos += 1;
                        while pos < self.bytes.len() && self.bytes[pos].is_ascii_alphabetic() {
                            pos += 1;
                        }
                        return Some(pos);
                    }
                    _ => {}
                }
            }
            pos += 1;
        }
        None
    }

    fn on_open_brace(&mut self) {
        let line = self.line;
        let column = self.col(self.i);
        self.i += 1;
        self.pending_require = None;
        self.require_paren = None;
        self.pending_new = false;

        let (owner, same_line) = if let Some((kw, kw_line)) = self.pending_keyword.take() {
            let same = kw_line == line;
            if kw == "function" {
                (BraceOwner::Function, same)
            } else {
                (BraceOwner::Control(kw), same)
            }
        } else if matches!(self.decl, DeclState::AwaitInit { .. }) {
            self.classify_init(InitKind::ObjectLiteral);
            (BraceOwner::ObjectLiteral, false)
        } else {
            match &self.prev {
                Prev::Arrow => (BraceOwner::Block, false),
                Prev::Punct(c) if matches!(c, b'=' | b'(' | b',' | b':' | b'[' | b'?') => {
                    (BraceOwner::ObjectLiteral, false)
                }
                Prev::Ident(w)
                    if matches!(w.as_str(), "return" | "typeof" | "case" | "in" | "of") =>
                {
                    (BraceOwner::ObjectLiteral, false)
                }
                _ => (BraceOwner::Block, false),
            }
        };

        let is_object = owner == BraceOwner::ObjectLiteral;
        let node = if owner == BraceOwner::Block {
            None
        } else {
            self.note_block_break();
            Some(self.emit(
                line,
                column,
                NodeData::BraceOpen {
                    owner,
                    same_line_as_owner: same_line,
                    close_line: None,
                },
            ))
        };

        self.frames.push(Frame {
            node,
            is_object,
            expect_key: is_object,
            paren_depth: self.paren_depth,
            bracket_depth: self.bracket_depth,
        });
        self.prev = Prev::Punct(b'{');
    }

    fn on_close_brace(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        self.i += 1;
        let frame = self
            .frames
            .pop()
            .ok_or(ParseError::UnexpectedCloseBrace { line })?;
        if let Some(idx) = frame.node {
            if let NodeData::BraceOpen { close_line, .. } = &mut self.nodes[idx].data {
                *close_line = Some(line);
            }
        }
        self.pending_keyword = None;
        self.pending_require = None;
        self.require_paren = None;
        self.pending_new = false;
        self.note_block_break();
        self.prev = Prev::Punct(b'}');
        Ok(())
    }

    fn on_punct(&mut self, c: u8) {
        // require( survives only its own '('; `new` chains survive only '.'
        let keep_require = c == b'(' && self.pending_require.is_some();
        if !keep_require {
            self.pending_require = None;
            self.require_paren = None;
        }
        if c != b'.' && !keep_require {
            self.pending_new = false;
        }

        match c {
            b'(' => {
                self.paren_depth += 1;
                if keep_require {
                    self.require_paren = self.pending_require.take();
                } else {
                    self.classify_init(InitKind::Other);
                }
            }
            b')' => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
            }
            b'[' => {
                self.bracket_depth += 1;
                self.classify_init(InitKind::Other);
            }
            b']' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
            }
            b';' => {
                if self.paren_depth == 0 {
                    self.pending_keyword = None;
                }
                self.close_declarator(InitKind::Other);
                if matches!(self.decl, DeclState::Active { .. })
                    && self.frames.len() == self.decl_brace_depth
                    && self.paren_depth == self.decl_paren_depth
                {
                    self.decl = DeclState::Idle;
                }
            }
            b',' => {
                // Next declarator of the same statement
                let at_decl_depth = self.frames.len() == self.decl_brace_depth
                    && self.paren_depth == self.decl_paren_depth;
                if at_decl_depth {
                    if matches!(self.decl, DeclState::AfterName { .. }) {
                        self.close_declarator(InitKind::Other);
                    }
                    if let DeclState::Active { kw } = self.decl.clone() {
                        self.decl = DeclState::ExpectName { kw };
                    }
                }
                // Next key of the enclosing object literal
                let (pd, bd) = (self.paren_depth, self.bracket_depth);
                if let Some(frame) = self.frames.last_mut() {
                    if frame.is_object && frame.paren_depth == pd && frame.bracket_depth == bd {
                        frame.expect_key = true;
                    }
                }
            }
            b'=' => {
                if self.bytes.get(self.i + 1) == Some(&b'>') {
                    self.i += 2;
                    self.prev = Prev::Arrow;
                    return;
                }
                if self.bytes.get(self.i + 1) == Some(&b'=') {
                    // comparison, not assignment
                    while self.bytes.get(self.i) == Some(&b'=') {
                        self.i += 1;
                    }
                    self.prev = Prev::Punct(b'=');
                    return;
                }
                if let DeclState::AfterName {
                    kw,
                    name,
                    line,
                    column,
                } = self.decl.clone()
                {
                    self.decl = DeclState::AwaitInit {
                        kw,
                        name,
                        line,
                        column,
                    };
                }
            }
            _ => {}
        }

        self.i += 1;
        self.prev = Prev::Punct(c);
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}

fn is_reserved(word: &str) -> bool {
    matches!(
        word,
        "var" | "let" | "const" | "function" | "if" | "else" | "for" | "while" | "do"
            | "switch" | "try" | "catch" | "finally" | "return" | "new" | "typeof" | "in"
            | "of" | "case" | "break" | "continue" | "throw" | "delete" | "instanceof"
            | "void" | "this"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{BraceOwner, DeclKeyword, InitKind, NodeData, NodeKind};
    use pretty_assertions::assert_eq;

    fn kinds(out: &ScanOutput) -> Vec<NodeKind> {
        out.tree.iter().map(|(_, n)| n.kind()).collect()
    }

    #[test]
    fn test_scan_empty() {
        let out = scan("").unwrap();
        assert_eq!(out.tree.len(), 1);
        assert_eq!(kinds(&out), vec![NodeKind::Program]);
    }

    #[test]
    fn test_control_brace_same_line() {
        let out = scan("if (x) {\n\tdoSomething();\n}\n").unwrap();
        let brace = out
            .tree
            .iter()
            .find_map(|(_, n)| match &n.data {
                NodeData::BraceOpen {
                    owner: BraceOwner::Control(kw),
                    same_line_as_owner,
                    close_line,
                } => Some((
                    kw.clone(),
                    *same_line_as_owner,
                    *close_line,
                    n.line,
                    n.column,
                )),
                _ => None,
            })
            .unwrap();
        assert_eq!(brace.0, "if");
        assert!(brace.1);
        assert_eq!(brace.2, Some(3));
        assert_eq!((brace.3, brace.4), (1, 8));
    }

    #[test]
    fn test_control_brace_next_line() {
        let out = scan("if (x)\n{\n\tdoSomething();\n}\n").unwrap();
        let same = out
            .tree
            .iter()
            .find_map(|(_, n)| match &n.data {
                NodeData::BraceOpen {
                    same_line_as_owner, ..
                } => Some(*same_line_as_owner),
                _ => None,
            })
            .unwrap();
        assert!(!same);
    }

    #[test]
    fn test_object_literal_brace_and_keys() {
        let out = scan("var o = {\n\talpha: 1,\n\tbeta: 2\n};\n").unwrap();
        let keys: Vec<String> = out
            .tree
            .iter()
            .filter_map(|(_, n)| match &n.data {
                NodeData::ObjectKey { key, .. } => Some(key.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(keys, vec!["alpha", "beta"]);

        let owner = out
            .tree
            .iter()
            .find_map(|(_, n)| match &n.data {
                NodeData::BraceOpen { owner, .. } => Some(owner.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(owner, BraceOwner::ObjectLiteral);
    }

    #[test]
    fn test_declaration_literal_init() {
        let out = scan("const MAX_RETRIES = 3;\n").unwrap();
        let decl = out
            .tree
            .iter()
            .find_map(|(_, n)| match &n.data {
                NodeData::Declaration {
                    keyword,
                    name,
                    init,
                } => Some((*keyword, name.clone(), init.clone())),
                _ => None,
            })
            .unwrap();
        assert_eq!(decl.0, DeclKeyword::Const);
        assert_eq!(decl.1, "MAX_RETRIES");
        assert_eq!(decl.2, InitKind::Literal);
    }

    #[test]
    fn test_declaration_new_init() {
        let out = scan("var server = new Server();\n").unwrap();
        let init = out
            .tree
            .iter()
            .find_map(|(_, n)| match &n.data {
                NodeData::Declaration { init, .. } => Some(init.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(init, InitKind::New("Server".to_string()));

        let callee = out
            .tree
            .iter()
            .find_map(|(_, n)| match &n.data {
                NodeData::NewExpr { callee } => Some(callee.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(callee, "Server");
    }

    #[test]
    fn test_new_member_chain() {
        let out = scan("var x = new lib.util.Widget();\n").unwrap();
        let callee = out
            .tree
            .iter()
            .find_map(|(_, n)| match &n.data {
                NodeData::NewExpr { callee } => Some(callee.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(callee, "Widget");
    }

    #[test]
    fn test_require_blocks() {
        let out = scan("require('Beta');\nrequire('Alpha');\n").unwrap();
        let reqs: Vec<(String, bool, usize)> = out
            .tree
            .iter()
            .filter_map(|(_, n)| match &n.data {
                NodeData::RequireCall {
                    module,
                    starts_block,
                } => Some((module.clone(), *starts_block, n.line)),
                _ => None,
            })
            .collect();
        assert_eq!(
            reqs,
            vec![
                ("Beta".to_string(), true, 1),
                ("Alpha".to_string(), false, 2)
            ]
        );
    }

    #[test]
    fn test_require_block_broken_by_statement() {
        let out = scan("require('b');\nfoo();\nrequire('a');\n").unwrap();
        let starts: Vec<bool> = out
            .tree
            .iter()
            .filter_map(|(_, n)| match &n.data {
                NodeData::RequireCall { starts_block, .. } => Some(*starts_block),
                _ => None,
            })
            .collect();
        assert_eq!(starts, vec![true, true]);
    }

    #[test]
    fn test_require_declaration() {
        let out = scan("var fs = require('fs');\nvar path = require('path');\n").unwrap();
        let decls: Vec<InitKind> = out
            .tree
            .iter()
            .filter_map(|(_, n)| match &n.data {
                NodeData::Declaration { init, .. } => Some(init.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            decls,
            vec![
                InitKind::Require("fs".to_string()),
                InitKind::Require("path".to_string())
            ]
        );
        let starts: Vec<bool> = out
            .tree
            .iter()
            .filter_map(|(_, n)| match &n.data {
                NodeData::RequireCall { starts_block, .. } => Some(*starts_block),
                _ => None,
            })
            .collect();
        assert_eq!(starts, vec![true, false]);
    }

    #[test]
    fn test_string_quote_analysis() {
        let out = scan("var a = \"it's fine\";\nvar b = \"fine\";\nvar c = 'ok';\n").unwrap();
        let strings: Vec<(char, bool)> = out
            .tree
            .iter()
            .filter_map(|(_, n)| match &n.data {
                NodeData::StringLiteral {
                    quote,
                    has_unescaped_single_quote,
                    ..
                } => Some((*quote, *has_unescaped_single_quote)),
                _ => None,
            })
            .collect();
        assert_eq!(strings, vec![('"', true), ('"', false), ('\'', false)]);
    }

    #[test]
    fn test_comments_collected() {
        let out = scan("// first\nvar a = 1; /* second\nspans */\n").unwrap();
        assert_eq!(out.comments.len(), 2);
        assert_eq!(out.comments[0].line, 1);
        assert!(out.comments[0].text.contains("first"));
        assert_eq!(out.comments[1].line, 2);
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            scan("var a = 'oops\n"),
            Err(ParseError::UnterminatedString { line: 1 })
        ));
    }

    #[test]
    fn test_unterminated_comment() {
        assert!(matches!(
            scan("/* never closed"),
            Err(ParseError::UnterminatedComment { line: 1 })
        ));
    }

    #[test]
    fn test_unexpected_close_brace() {
        assert!(matches!(
            scan("}\n"),
            Err(ParseError::UnexpectedCloseBrace { line: 1 })
        ));
    }

    #[test]
    fn test_regex_literal_not_misparsed() {
        // The quote inside the regex must not open a string
        let out = scan("var re = /['\"]/;\nvar b = 'after';\n").unwrap();
        let strings: Vec<char> = out
            .tree
            .iter()
            .filter_map(|(_, n)| match &n.data {
                NodeData::StringLiteral { quote, .. } => Some(*quote),
                _ => None,
            })
            .collect();
        assert_eq!(strings, vec!['\'']);
    }

    #[test]
    fn test_inline_brace_close_line() {
        let out = scan("if (x) { doSomething(); }\n").unwrap();
        let close = out
            .tree
            .iter()
            .find_map(|(_, n)| match &n.data {
                NodeData::BraceOpen { close_line, .. } => Some(*close_line),
                _ => None,
            })
            .unwrap();
        assert_eq!(close, Some(1));
    }

    #[test]
    fn test_function_brace_owner() {
        let out = scan("function setup() {\n\treturn 1;\n}\n").unwrap();
        let owner = out
            .tree
            .iter()
            .find_map(|(_, n)| match &n.data {
                NodeData::BraceOpen { owner, .. } => Some(owner.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(owner, BraceOwner::Function);
    }

    #[test]
    fn test_for_header_keeps_keyword() {
        let out = scan("for (var i = 0; i < 3; i++) {\n\twork();\n}\n").unwrap();
        let owner = out
            .tree
            .iter()
            .find_map(|(_, n)| match &n.data {
                NodeData::BraceOpen {
                    owner: BraceOwner::Control(kw),
                    same_line_as_owner,
                    ..
                } => Some((kw.clone(), *same_line_as_owner)),
                _ => None,
            })
            .unwrap();
        assert_eq!(owner.0, "for");
        assert!(owner.1);
    }

    #[test]
    fn test_multi_declarator() {
        let out = scan("var a = 1, b = 'two';\n").unwrap();
        let names: Vec<String> = out
            .tree
            .iter()
            .filter_map(|(_, n)| match &n.data {
                NodeData::Declaration { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_nested_object_keys_attach_to_their_literal() {
        let out = scan("var o = { outer: { inner: 1 }, last: 2 };\n").unwrap();
        let keys: Vec<(String, usize)> = out
            .tree
            .iter()
            .filter_map(|(_, n)| match &n.data {
                NodeData::ObjectKey { key, literal } => Some((key.clone(), *literal)),
                _ => None,
            })
            .collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0].0, "outer");
        assert_eq!(keys[1].0, "inner");
        assert_eq!(keys[2].0, "last");
        // outer and last share a literal; inner belongs to the nested one
        assert_eq!(keys[0].1, keys[2].1);
        assert_ne!(keys[0].1, keys[1].1);
    }

    #[test]
    fn test_array_comma_does_not_make_keys() {
        let out = scan("var o = { a: [1, x ? y : z], b: 2 };\n").unwrap();
        let keys: Vec<String> = out
            .tree
            .iter()
            .filter_map(|(_, n)| match &n.data {
                NodeData::ObjectKey { key, .. } => Some(key.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
