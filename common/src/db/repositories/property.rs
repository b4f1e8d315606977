// Property repository implementation
// Search builds its WHERE/HAVING clauses from whichever filters are present.

use super::queries::property_queries;
use super::validate_limit;
use crate::db::predicate::{Clause, Operator, PredicateSet, SqlValue};
use crate::db::DbPool;
use crate::errors::{DatabaseError, ValidationError};
use crate::models::{NewProperty, Property, PropertyFilter, PropertyListing};
use tracing::instrument;

/// A fully assembled search statement and its bind values, limit last
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
    pub limit: i64,
}

/// Dollars to cents, rejecting values that do not fit the column
fn dollars_to_cents(field: &str, dollars: i32) -> Result<i32, ValidationError> {
    dollars
        .checked_mul(100)
        .ok_or_else(|| ValidationError::invalid(field, format!("{} is out of range", dollars)))
}

/// Escape LIKE metacharacters so the value matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Assemble the property search statement for `filter`
///
/// Row filters go into WHERE, the rating filter into HAVING since it is an
/// aggregate. Each clause tracks its own first predicate.
pub fn build_search_query(
    filter: &PropertyFilter,
    limit: i64,
) -> Result<SearchQuery, ValidationError> {
    validate_limit(limit)?;

    let mut row_filters = PredicateSet::new(Clause::Where);
    let mut aggregate_filters = PredicateSet::new(Clause::Having);

    if let Some(owner_id) = filter.owner_id {
        row_filters.push("properties.owner_id", Operator::Eq, SqlValue::Int(owner_id));
    }

    if let Some(city) = filter.city.as_deref().filter(|c| !c.trim().is_empty()) {
        row_filters.push(
            "properties.city",
            Operator::Like,
            SqlValue::Text(format!("%{}%", escape_like(city))),
        );
    }

    if let Some(min) = filter.minimum_price_per_night {
        let cents = dollars_to_cents("minimum_price_per_night", min)?;
        row_filters.push("properties.cost_per_night", Operator::Gte, SqlValue::Int(cents));
    }

    if let Some(max) = filter.maximum_price_per_night {
        let cents = dollars_to_cents("maximum_price_per_night", max)?;
        row_filters.push("properties.cost_per_night", Operator::Lte, SqlValue::Int(cents));
    }

    if let Some(rating) = filter.minimum_rating {
        if !rating.is_finite() {
            return Err(ValidationError::invalid(
                "minimum_rating",
                "must be a finite number",
            ));
        }
    }

    // A floor of zero or less excludes nothing except unreviewed properties
    // (NULL average), so it is not applied
    if let Some(rating) = filter.minimum_rating.filter(|r| *r > 0.0) {
        aggregate_filters.push(
            property_queries::AVERAGE_RATING,
            Operator::Gte,
            SqlValue::Float(rating),
        );
    }

    let mut sql = format!(
        r#"SELECT {}, {} AS average_rating
FROM properties
LEFT JOIN property_reviews ON properties.id = property_reviews.property_id"#,
        property_queries::SELECT_ALL_COLUMNS,
        property_queries::AVERAGE_RATING
    );

    let next = row_filters.render(&mut sql, 1);
    sql.push_str("\nGROUP BY properties.id");
    let next = aggregate_filters.render(&mut sql, next);
    sql.push_str(&format!(
        "\nORDER BY properties.cost_per_night, properties.id\nLIMIT ${}",
        next
    ));

    let params = row_filters
        .values()
        .chain(aggregate_filters.values())
        .cloned()
        .collect();

    Ok(SearchQuery { sql, params, limit })
}

/// Repository for property-related database operations
#[derive(Clone)]
pub struct PropertyRepository {
    pool: DbPool,
}

impl PropertyRepository {
    /// Create a new PropertyRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Search properties, cheapest first, with their average rating
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        filter: &PropertyFilter,
        limit: i64,
    ) -> Result<Vec<PropertyListing>, DatabaseError> {
        let search = build_search_query(filter, limit)?;
        tracing::debug!(sql = %search.sql, params = ?search.params, "Property search");

        let mut query = sqlx::query_as::<_, PropertyListing>(&search.sql);
        for value in &search.params {
            query = match value {
                SqlValue::Int(v) => query.bind(*v),
                SqlValue::Float(v) => query.bind(*v),
                SqlValue::Text(v) => query.bind(v.as_str()),
            };
        }

        let listings = query
            .bind(search.limit)
            .fetch_all(self.pool.pool())
            .await?;

        tracing::debug!(count = listings.len(), "Found properties");
        Ok(listings)
    }

    /// Insert a property and return the stored row with its generated id
    #[instrument(skip(self, property), fields(owner_id = property.owner_id))]
    pub async fn create(&self, property: &NewProperty) -> Result<Property, DatabaseError> {
        let query = format!(
            r#"
            INSERT INTO properties (
                owner_id, title, description,
                thumbnail_photo_url, cover_photo_url, cost_per_night,
                street, city, province, post_code, country,
                parking_spaces, number_of_bathrooms, number_of_bedrooms
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            property_queries::SELECT_ALL_COLUMNS
        );

        let created = sqlx::query_as::<_, Property>(&query)
            .bind(property.owner_id)
            .bind(&property.title)
            .bind(&property.description)
            .bind(&property.thumbnail_photo_url)
            .bind(&property.cover_photo_url)
            .bind(property.cost_per_night)
            .bind(&property.street)
            .bind(&property.city)
            .bind(&property.province)
            .bind(&property.post_code)
            .bind(&property.country)
            .bind(property.parking_spaces)
            .bind(property.number_of_bathrooms)
            .bind(property.number_of_bedrooms)
            .fetch_one(self.pool.pool())
            .await?;

        tracing::info!(property_id = created.id, "Property created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn where_section(sql: &str) -> &str {
        let start = sql.find("LEFT JOIN").unwrap();
        let end = sql.find("GROUP BY").unwrap();
        &sql[start..end]
    }

    #[test]
    fn test_no_filters_has_no_where_or_having() {
        let q = build_search_query(&PropertyFilter::default(), 10).unwrap();
        assert!(!q.sql.contains("WHERE"));
        assert!(!q.sql.contains("HAVING"));
        assert!(q.sql.ends_with("LIMIT $1"));
        assert!(q.params.is_empty());
        assert_eq!(q.limit, 10);
    }

    #[test]
    fn test_city_alone_uses_where() {
        let filter = PropertyFilter {
            city: Some("Van".to_string()),
            ..Default::default()
        };
        let q = build_search_query(&filter, 10).unwrap();
        assert!(where_section(&q.sql).contains("\nWHERE properties.city LIKE $1"));
        assert!(!q.sql.contains("AND"));
        assert_eq!(q.params, vec![SqlValue::Text("%Van%".to_string())]);
        assert!(q.sql.ends_with("LIMIT $2"));
    }

    #[test]
    fn test_city_and_minimum_price_are_joined_with_and() {
        let filter = PropertyFilter {
            city: Some("Van".to_string()),
            minimum_price_per_night: Some(50),
            ..Default::default()
        };
        let q = build_search_query(&filter, 5).unwrap();
        let section = where_section(&q.sql);
        assert!(section.contains("\nWHERE properties.city LIKE $1"));
        assert!(section.contains("\nAND properties.cost_per_night >= $2"));
        assert_eq!(
            q.params,
            vec![SqlValue::Text("%Van%".to_string()), SqlValue::Int(5000)]
        );
        assert!(q.sql.contains("ORDER BY properties.cost_per_night"));
        assert!(q.sql.ends_with("LIMIT $3"));
    }

    #[test]
    fn test_rating_goes_into_having() {
        let filter = PropertyFilter {
            minimum_rating: Some(4.0),
            ..Default::default()
        };
        let q = build_search_query(&filter, 10).unwrap();
        assert!(!q.sql.contains("WHERE"));
        assert!(q
            .sql
            .contains("\nHAVING avg(property_reviews.rating)::float8 >= $1"));
        let group_by = q.sql.find("GROUP BY").unwrap();
        let having = q.sql.find("HAVING").unwrap();
        assert!(group_by < having);
        assert_eq!(q.params, vec![SqlValue::Float(4.0)]);
    }

    #[test]
    fn test_all_filters() {
        let filter = PropertyFilter {
            owner_id: Some(2),
            city: Some("Van".to_string()),
            minimum_price_per_night: Some(50),
            maximum_price_per_night: Some(300),
            minimum_rating: Some(3.5),
        };
        let q = build_search_query(&filter, 20).unwrap();
        assert_eq!(q.sql.matches("WHERE").count(), 1);
        assert_eq!(q.sql.matches("\nAND ").count(), 3);
        assert_eq!(q.sql.matches("HAVING").count(), 1);
        assert_eq!(q.params.len(), 5);
        assert_eq!(q.params[2], SqlValue::Int(5000));
        assert_eq!(q.params[3], SqlValue::Int(30000));
        assert!(q.sql.ends_with("LIMIT $6"));
    }

    #[test]
    fn test_whitespace_city_is_ignored() {
        let filter = PropertyFilter {
            city: Some("   ".to_string()),
            ..Default::default()
        };
        let q = build_search_query(&filter, 10).unwrap();
        assert!(!q.sql.contains("WHERE"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn test_city_like_metacharacters_match_literally() {
        let filter = PropertyFilter {
            city: Some(r"50%_off\x".to_string()),
            ..Default::default()
        };
        let q = build_search_query(&filter, 10).unwrap();
        assert_eq!(
            q.params,
            vec![SqlValue::Text(r"%50\%\_off\\x%".to_string())]
        );
    }

    #[test]
    fn test_city_keeps_surrounding_spaces() {
        let filter = PropertyFilter {
            city: Some(" Van".to_string()),
            ..Default::default()
        };
        let q = build_search_query(&filter, 10).unwrap();
        assert_eq!(q.params, vec![SqlValue::Text("% Van%".to_string())]);
    }

    #[test]
    fn test_non_positive_rating_applies_no_having() {
        for rating in [0.0, -1.0] {
            let filter = PropertyFilter {
                minimum_rating: Some(rating),
                ..Default::default()
            };
            let q = build_search_query(&filter, 10).unwrap();
            assert!(!q.sql.contains("HAVING"), "rating {} added HAVING", rating);
            assert!(q.params.is_empty());
        }
    }

    #[test]
    fn test_empty_city_is_ignored() {
        let filter = PropertyFilter {
            city: Some(String::new()),
            ..Default::default()
        };
        let q = build_search_query(&filter, 10).unwrap();
        assert!(!q.sql.contains("WHERE"));
    }

    #[test]
    fn test_price_overflow_is_rejected() {
        let filter = PropertyFilter {
            maximum_price_per_night: Some(i32::MAX),
            ..Default::default()
        };
        let err = build_search_query(&filter, 10).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidFieldValue { ref field, .. } if field == "maximum_price_per_night"
        ));
    }

    #[test]
    fn test_nan_rating_is_rejected() {
        let filter = PropertyFilter {
            minimum_rating: Some(f64::NAN),
            ..Default::default()
        };
        assert!(build_search_query(&filter, 10).is_err());
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        assert!(build_search_query(&PropertyFilter::default(), 0).is_err());
        assert!(build_search_query(&PropertyFilter::default(), -3).is_err());
    }
}
