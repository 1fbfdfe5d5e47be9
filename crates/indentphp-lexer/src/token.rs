use logos::Logos;

/// Consume a quoted string body up to the unescaped `quote`, which the
/// matching `#[token]` has already consumed on the opening side.
fn lex_quoted(lex: &mut logos::Lexer<TokenKind>, quote: char) -> bool {
    let remainder = lex.remainder();
    let mut chars = remainder.chars();
    loop {
        match chars.next() {
            Some('\\') => {
                chars.next(); // skip escaped char
            }
            Some(c) if c == quote => {
                let consumed = remainder.len() - chars.as_str().len();
                lex.bump(consumed);
                return true;
            }
            Some(_) => {}
            None => return false,
        }
    }
}

fn lex_single_quoted_string(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_quoted(lex, '\'')
}

fn lex_double_quoted_string(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_quoted(lex, '"')
}

/// Token kinds. Variants carrying a `logos` attribute are the PHP-mode
/// rules; the rest are produced by the [`Lexer`](crate::Lexer) wrapper
/// (tags, HTML characters, end of input) or resolved from identifiers.
///
/// Whitespace is not skipped: the grammar consumes it explicitly.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // --- Literals ---
    #[regex(r"0[xX][0-9a-fA-F]+")]
    #[regex(r"([0-9]*\.[0-9]+|[0-9]+\.[0-9]*|[0-9]+)([eE][-+]?[0-9]+)?")]
    Number,

    #[token("'", lex_single_quoted_string)]
    SingleQuotedString,

    #[token("\"", lex_double_quoted_string)]
    DoubleQuotedString,

    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_]*")]
    Variable,

    // --- Identifiers (keywords resolved from these) ---
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // --- Operators and punctuation ---
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("=")]
    Equals,
    #[token("=>")]
    FatArrow,
    #[token("&")]
    Ampersand,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("::")]
    DoubleColon,

    // --- Delimiters ---
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,

    // --- Whitespace ---
    #[token(" ")]
    Space,
    #[token("\t")]
    Tab,
    #[regex(r"\r\n|\n|\r")]
    Newline,

    // --- Keywords (resolved from Identifier) ---
    Function,
    Array,
    Class,
    Abstract,
    Final,
    Extends,
    Implements,
    Var,
    Public,
    Private,
    Protected,
    Static,
    Const,
    Interface,
    If,
    Else,
    Return,
    Isset,
    Empty,

    // --- Magic constants ---
    MagicLine,
    MagicFile,
    MagicClass,
    MagicMethod,
    MagicFunction,

    // --- PHP tags ---
    /// `<?php`, only recognised in HTML mode.
    OpenTag,
    /// `<?`, only recognised in HTML mode.
    ShortOpenTag,
    #[token("?>")]
    CloseTag,

    /// One character of text outside PHP tags.
    HtmlChar,

    Eof,
}

impl TokenKind {
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Space | TokenKind::Tab | TokenKind::Newline)
    }

    /// Literal tokens that form a scalar on their own.
    pub fn is_common_scalar(self) -> bool {
        matches!(
            self,
            TokenKind::Number
                | TokenKind::SingleQuotedString
                | TokenKind::DoubleQuotedString
                | TokenKind::MagicLine
                | TokenKind::MagicFile
                | TokenKind::MagicClass
                | TokenKind::MagicMethod
                | TokenKind::MagicFunction
        )
    }
}

/// Resolve a keyword from an identifier string. Returns the keyword TokenKind
/// if the string is reserved, or None if it's a plain identifier.
pub fn resolve_keyword(text: &str) -> Option<TokenKind> {
    // PHP keywords are case-insensitive
    match text.to_ascii_lowercase().as_str() {
        "function" => Some(TokenKind::Function),
        "array" => Some(TokenKind::Array),
        "class" => Some(TokenKind::Class),
        "abstract" => Some(TokenKind::Abstract),
        "final" => Some(TokenKind::Final),
        "extends" => Some(TokenKind::Extends),
        "implements" => Some(TokenKind::Implements),
        "var" => Some(TokenKind::Var),
        "public" => Some(TokenKind::Public),
        "private" => Some(TokenKind::Private),
        "protected" => Some(TokenKind::Protected),
        "static" => Some(TokenKind::Static),
        "const" => Some(TokenKind::Const),
        "interface" => Some(TokenKind::Interface),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "return" => Some(TokenKind::Return),
        "isset" => Some(TokenKind::Isset),
        "empty" => Some(TokenKind::Empty),
        "__line__" => Some(TokenKind::MagicLine),
        "__file__" => Some(TokenKind::MagicFile),
        "__class__" => Some(TokenKind::MagicClass),
        "__method__" => Some(TokenKind::MagicMethod),
        "__function__" => Some(TokenKind::MagicFunction),
        _ => None,
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number => write!(f, "number"),
            TokenKind::SingleQuotedString | TokenKind::DoubleQuotedString => write!(f, "string"),
            TokenKind::Variable => write!(f, "variable"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::FatArrow => write!(f, "'=>'"),
            TokenKind::Ampersand => write!(f, "'&'"),
            TokenKind::Question => write!(f, "'?'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::DoubleColon => write!(f, "'::'"),
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::LeftBracket => write!(f, "'['"),
            TokenKind::RightBracket => write!(f, "']'"),
            TokenKind::LeftBrace => write!(f, "'{{'"),
            TokenKind::RightBrace => write!(f, "'}}'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Space => write!(f, "space"),
            TokenKind::Tab => write!(f, "tab"),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::Function => write!(f, "'function'"),
            TokenKind::Array => write!(f, "'array'"),
            TokenKind::Class => write!(f, "'class'"),
            TokenKind::Abstract => write!(f, "'abstract'"),
            TokenKind::Final => write!(f, "'final'"),
            TokenKind::Extends => write!(f, "'extends'"),
            TokenKind::Implements => write!(f, "'implements'"),
            TokenKind::Var => write!(f, "'var'"),
            TokenKind::Public => write!(f, "'public'"),
            TokenKind::Private => write!(f, "'private'"),
            TokenKind::Protected => write!(f, "'protected'"),
            TokenKind::Static => write!(f, "'static'"),
            TokenKind::Const => write!(f, "'const'"),
            TokenKind::Interface => write!(f, "'interface'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::Isset => write!(f, "'isset'"),
            TokenKind::Empty => write!(f, "'empty'"),
            TokenKind::MagicLine => write!(f, "'__LINE__'"),
            TokenKind::MagicFile => write!(f, "'__FILE__'"),
            TokenKind::MagicClass => write!(f, "'__CLASS__'"),
            TokenKind::MagicMethod => write!(f, "'__METHOD__'"),
            TokenKind::MagicFunction => write!(f, "'__FUNCTION__'"),
            TokenKind::OpenTag => write!(f, "'<?php'"),
            TokenKind::ShortOpenTag => write!(f, "'<?'"),
            TokenKind::CloseTag => write!(f, "'?>'"),
            TokenKind::HtmlChar => write!(f, "HTML text"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}
