use crate::Line;

/// A lexed token with its source line.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: Line,
}

impl Token {
    pub fn new(kind: TokenKind, line: Line) -> Self {
        Token { kind, line }
    }
}

/// The closed token set of the Fable grammar.
///
/// Multi-character operators are lexed with maximal munch, so `<?=` is a
/// single token and never `<` `?` `=`.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Literals and names
    Int(i64),
    Float(f64),
    Text(String),
    Name(String),

    // Keywords
    Index,
    Yes,
    No,
    Nothing,
    Always,
    And,
    Or,
    Xor,

    // Single-character operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Bang,
    Question,
    Hash,
    At,
    Assign,

    // Comparison operators
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Arrows and combinators
    Arrow,       // ->
    ReturnArrow, // <-
    Reload,      // <<
    Detect,      // <?=
    Transform,   // =>
    Pipe,        // |
    Reduce,      // >>
    Swap,        // <=>
    Unfold,      // ..

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semi,

    Eof,
}

impl TokenKind {
    /// Short human-readable name, used in syntax error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Int(_) | TokenKind::Float(_) => "a number",
            TokenKind::Text(_) => "a text literal",
            TokenKind::Name(_) => "a name",
            TokenKind::Index => "'index'",
            TokenKind::Yes => "'yes'",
            TokenKind::No => "'no'",
            TokenKind::Nothing => "'nothing'",
            TokenKind::Always => "'always'",
            TokenKind::And => "'and'",
            TokenKind::Or => "'or'",
            TokenKind::Xor => "'xor'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Caret => "'^'",
            TokenKind::Bang => "'!'",
            TokenKind::Question => "'?'",
            TokenKind::Hash => "'#'",
            TokenKind::At => "'@'",
            TokenKind::Assign => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::Arrow => "'->'",
            TokenKind::ReturnArrow => "'<-'",
            TokenKind::Reload => "'<<'",
            TokenKind::Detect => "'<?='",
            TokenKind::Transform => "'=>'",
            TokenKind::Pipe => "'|'",
            TokenKind::Reduce => "'>>'",
            TokenKind::Swap => "'<=>'",
            TokenKind::Unfold => "'..'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Semi => "';'",
            TokenKind::Eof => "end of input",
        }
    }
}
