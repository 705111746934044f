use std::fmt;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    /// Equal (`=`, `==`, `IS`)
    Eq,
    /// Not equal (`!=`, `<>`, `~=`)
    Neq,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    Gte,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    Lte,
    /// Membership in a list (`IN`)
    In,
    /// Non-membership in a list (`NOT IN`)
    NotIn,
    /// Substring match (`CONTAINS`)
    Contains,
    /// Prefix match (`STARTS WITH`)
    StartsWith,
    /// Suffix match (`ENDS WITH`)
    EndsWith,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::NotIn,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
    ];

    /// Canonical text used when serialising.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Contains => "CONTAINS",
            Operator::StartsWith => "STARTS WITH",
            Operator::EndsWith => "ENDS WITH",
        }
    }

    /// Symbolic name (`EQ`, `NOT_IN`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Operator::Eq => "EQ",
            Operator::Neq => "NEQ",
            Operator::Gt => "GT",
            Operator::Gte => "GTE",
            Operator::Lt => "LT",
            Operator::Lte => "LTE",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
            Operator::Contains => "CONTAINS",
            Operator::StartsWith => "STARTS_WITH",
            Operator::EndsWith => "ENDS_WITH",
        }
    }

    /// `IN` and `NOT IN` take a list; everything else takes a scalar.
    pub fn takes_list(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    /// The operator that matches exactly the complement, where one exists.
    ///
    /// The string operators have no complement in the operator set.
    pub fn negated(self) -> Option<Operator> {
        match self {
            Operator::Eq => Some(Operator::Neq),
            Operator::Neq => Some(Operator::Eq),
            Operator::Gt => Some(Operator::Lte),
            Operator::Gte => Some(Operator::Lt),
            Operator::Lt => Some(Operator::Gte),
            Operator::Lte => Some(Operator::Gt),
            Operator::In => Some(Operator::NotIn),
            Operator::NotIn => Some(Operator::In),
            Operator::Contains | Operator::StartsWith | Operator::EndsWith => None,
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A set of operators, small enough to copy around freely.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OperatorSet(u16);

impl OperatorSet {
    pub const fn empty() -> Self {
        OperatorSet(0)
    }

    pub fn all() -> Self {
        Operator::ALL.into_iter().collect()
    }

    pub fn of(operators: &[Operator]) -> Self {
        operators.iter().copied().collect()
    }

    pub fn contains(&self, operator: Operator) -> bool {
        self.0 & operator.bit() != 0
    }

    pub fn insert(&mut self, operator: Operator) {
        self.0 |= operator.bit();
    }

    pub fn remove(&mut self, operator: Operator) {
        self.0 &= !operator.bit();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Operator> + use<> {
        let set = *self;
        Operator::ALL.into_iter().filter(move |op| set.contains(*op))
    }
}

impl FromIterator<Operator> for OperatorSet {
    fn from_iter<I: IntoIterator<Item = Operator>>(iter: I) -> Self {
        let mut set = OperatorSet::empty();
        for op in iter {
            set.insert(op);
        }
        set
    }
}

impl fmt::Debug for OperatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(Operator::name)).finish()
    }
}

#[test]
fn test_operator_set_membership() {
    let set = OperatorSet::of(&[Operator::Eq, Operator::In]);
    assert!(set.contains(Operator::Eq));
    assert!(set.contains(Operator::In));
    assert!(!set.contains(Operator::Contains));
    assert_eq!(set.len(), 2);
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![Operator::Eq, Operator::In]);
}

#[test]
fn test_negation_is_an_involution() {
    for op in Operator::ALL {
        if let Some(neg) = op.negated() {
            assert_eq!(neg.negated(), Some(op));
        }
    }
}
