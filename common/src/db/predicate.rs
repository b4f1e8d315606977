// Predicate builder for optional-filter queries
//
// Each clause (WHERE, HAVING) is a list of (column, operator, value) triples.
// The first rendered predicate gets the clause keyword, every later one gets
// AND. Placeholders are numbered from the caller's running index so several
// clauses can share one parameter list.

/// A value bound to a positional placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i32),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Like,
    Gte,
    Lte,
}

impl Operator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Like => "LIKE",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }
}

/// One filter condition; `column` is a trusted SQL expression, never user input
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub operator: Operator,
    pub value: SqlValue,
}

/// Which clause a predicate set renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Where,
    Having,
}

impl Clause {
    fn keyword(self) -> &'static str {
        match self {
            Clause::Where => "WHERE",
            Clause::Having => "HAVING",
        }
    }
}

/// Ordered predicates for a single clause
#[derive(Debug, Clone)]
pub struct PredicateSet {
    clause: Clause,
    predicates: Vec<Predicate>,
}

impl PredicateSet {
    pub fn new(clause: Clause) -> Self {
        Self {
            clause,
            predicates: Vec::new(),
        }
    }

    pub fn push(&mut self, column: &'static str, operator: Operator, value: SqlValue) {
        self.predicates.push(Predicate {
            column,
            operator,
            value,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Append the clause to `sql`, numbering placeholders from `next_param`.
    ///
    /// Returns the next free placeholder index. Appends nothing when empty.
    pub fn render(&self, sql: &mut String, next_param: usize) -> usize {
        let mut param = next_param;
        let mut first = true;

        for predicate in &self.predicates {
            let joiner = if first { self.clause.keyword() } else { "AND" };
            first = false;

            sql.push_str(&format!(
                "\n{} {} {} ${}",
                joiner,
                predicate.column,
                predicate.operator.as_sql(),
                param
            ));
            param += 1;
        }

        param
    }

    /// Values in placeholder order
    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.predicates.iter().map(|p| &p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_renders_nothing() {
        let set = PredicateSet::new(Clause::Where);
        let mut sql = String::from("SELECT 1");
        let next = set.render(&mut sql, 1);
        assert_eq!(sql, "SELECT 1");
        assert_eq!(next, 1);
    }

    #[test]
    fn test_first_predicate_gets_where_rest_get_and() {
        let mut set = PredicateSet::new(Clause::Where);
        set.push("city", Operator::Like, SqlValue::Text("%Van%".to_string()));
        set.push("cost_per_night", Operator::Gte, SqlValue::Int(5000));

        let mut sql = String::new();
        let next = set.render(&mut sql, 1);

        assert_eq!(sql, "\nWHERE city LIKE $1\nAND cost_per_night >= $2");
        assert_eq!(next, 3);
    }

    #[test]
    fn test_having_clause_continues_numbering() {
        let mut where_set = PredicateSet::new(Clause::Where);
        where_set.push("owner_id", Operator::Eq, SqlValue::Int(4));
        let mut having = PredicateSet::new(Clause::Having);
        having.push("avg(rating)", Operator::Gte, SqlValue::Float(4.0));

        let mut sql = String::new();
        let next = where_set.render(&mut sql, 1);
        let next = having.render(&mut sql, next);

        assert_eq!(sql, "\nWHERE owner_id = $1\nHAVING avg(rating) >= $2");
        assert_eq!(next, 3);
    }

    #[test]
    fn test_values_follow_push_order() {
        let mut set = PredicateSet::new(Clause::Where);
        set.push("a", Operator::Eq, SqlValue::Int(1));
        set.push("b", Operator::Lte, SqlValue::Int(2));
        let values: Vec<_> = set.values().cloned().collect();
        assert_eq!(values, vec![SqlValue::Int(1), SqlValue::Int(2)]);
        assert_eq!(set.len(), 2);
    }
}
