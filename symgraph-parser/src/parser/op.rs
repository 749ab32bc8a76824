use std::fmt;

/// The precedence levels of the grammar, from loosest to tightest binding.
///
/// The derived [`Ord`] follows declaration order, which is what the precedence climber compares
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Matches any expression.
    Any,

    /// Comparison operators, such as `=` and `<`.
    Relation,

    /// Addition and subtraction.
    Term,

    /// Multiplication and division, explicit or implicit.
    Factor,

    /// Unary negation. Binds tighter than multiplication but looser than exponentiation, so
    /// `-x**2` parses as `-(x**2)`.
    Neg,

    /// Exponentiation.
    Exp,
}

impl Precedence {
    /// The next-tighter precedence level, used as the right-hand minimum for left-associative
    /// operators.
    pub fn next(self) -> Precedence {
        match self {
            Precedence::Any => Precedence::Relation,
            Precedence::Relation => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Neg,
            Precedence::Neg => Precedence::Exp,
            Precedence::Exp => Precedence::Exp,
        }
    }
}

/// The associativity of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// The kinds of binary operators in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Exp,
    Mul,
    Div,
    Add,
    Sub,
    Eq,
    NotEq,
    Greater,
    GreaterEq,
    Less,
    LessEq,
}

impl BinOpKind {
    /// Returns the precedence of the operator.
    pub fn precedence(self) -> Precedence {
        match self {
            BinOpKind::Exp => Precedence::Exp,
            BinOpKind::Mul | BinOpKind::Div => Precedence::Factor,
            BinOpKind::Add | BinOpKind::Sub => Precedence::Term,
            _ => Precedence::Relation,
        }
    }

    /// Returns the associativity of the operator.
    pub fn associativity(self) -> Associativity {
        match self {
            BinOpKind::Exp => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Returns true for the comparison operators.
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinOpKind::Eq
                | BinOpKind::NotEq
                | BinOpKind::Greater
                | BinOpKind::GreaterEq
                | BinOpKind::Less
                | BinOpKind::LessEq,
        )
    }

    /// The canonical spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOpKind::Exp => "**",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Eq => "=",
            BinOpKind::NotEq => "!=",
            BinOpKind::Greater => ">",
            BinOpKind::GreaterEq => ">=",
            BinOpKind::Less => "<",
            BinOpKind::LessEq => "<=",
        }
    }
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The kinds of unary operators in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpKind {
    Neg,
}
