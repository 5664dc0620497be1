//! PostgreSQL rendering of event predicates using SeaQuery.
//!
//! Statements are rendered to strings with inline, escaped values and
//! executed through sqlx by the Postgres store.

use sea_query::{
    Alias, Asterisk, Cond, Expr, ExprTrait, Func, Iden, Order, PostgresQueryBuilder, Query,
    SelectStatement, SimpleExpr,
};

use crate::filter::{Field, Predicate, Value};
use crate::models::{PageRequest, SortDirection, SortKey};

#[derive(Iden, Clone, Copy)]
pub enum Events {
    Table,
    Id,
    Name,
    ArtistName,
    EventDateTime,
    Price,
    Status,
    Category,
    VenueId,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Venues {
    Table,
    Id,
    Name,
    Address,
    City,
    State,
}

#[derive(Iden, Clone, Copy)]
pub enum Users {
    Table,
    Id,
    Name,
}

fn column(field: Field) -> SimpleExpr {
    match field {
        Field::Status => Expr::col((Events::Table, Events::Status)).into(),
        Field::Name => Expr::col((Events::Table, Events::Name)).into(),
        Field::ArtistName => Expr::col((Events::Table, Events::ArtistName)).into(),
        Field::Category => Expr::col((Events::Table, Events::Category)).into(),
        Field::VenueCity => Expr::col((Venues::Table, Venues::City)).into(),
        Field::EventDateTime => Expr::col((Events::Table, Events::EventDateTime)).into(),
        Field::Price => Expr::col((Events::Table, Events::Price)).into(),
    }
}

fn literal(value: &Value) -> sea_query::Value {
    match value {
        Value::Status(status) => status.as_str().into(),
        Value::Category(category) => category.as_str().into(),
        Value::DateTime(at) => (*at).into(),
        Value::Decimal(amount) => (*amount).into(),
    }
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Translates a predicate tree into a WHERE expression.
pub fn expr(predicate: &Predicate) -> SimpleExpr {
    match predicate {
        Predicate::Eq(field, value) => column(*field).eq(literal(value)),
        Predicate::Gte(field, value) => column(*field).gte(literal(value)),
        Predicate::Lte(field, value) => column(*field).lte(literal(value)),
        Predicate::Contains(field, needle) => SimpleExpr::from(Func::lower(column(*field)))
            .like(format!("%{}%", escape_like_wildcards(needle))),
        Predicate::And(predicates) => predicates
            .iter()
            .fold(Cond::all(), |cond, p| cond.add(expr(p)))
            .into(),
        Predicate::Or(predicates) => predicates
            .iter()
            .fold(Cond::any(), |cond, p| cond.add(expr(p)))
            .into(),
    }
}

fn join_venues(query: &mut SelectStatement) {
    query.inner_join(
        Venues::Table,
        Expr::col((Venues::Table, Venues::Id)).equals((Events::Table, Events::VenueId)),
    );
}

fn sort_column(key: SortKey) -> (Events, Events) {
    match key {
        SortKey::EventDateTime => (Events::Table, Events::EventDateTime),
        SortKey::Price => (Events::Table, Events::Price),
        SortKey::Name => (Events::Table, Events::Name),
        SortKey::CreatedAt => (Events::Table, Events::CreatedAt),
    }
}

/// One page of events joined with their venue summary and creator name.
pub fn search_statement(predicate: &Predicate, page: &PageRequest) -> String {
    let mut query = Query::select();

    query
        .column((Events::Table, Asterisk))
        .expr_as(Expr::col((Venues::Table, Venues::Name)), Alias::new("venue_name"))
        .expr_as(
            Expr::col((Venues::Table, Venues::Address)),
            Alias::new("venue_address"),
        )
        .expr_as(Expr::col((Venues::Table, Venues::City)), Alias::new("venue_city"))
        .expr_as(Expr::col((Venues::Table, Venues::State)), Alias::new("venue_state"))
        .expr_as(Expr::col((Users::Table, Users::Name)), Alias::new("creator_name"))
        .from(Events::Table);

    join_venues(&mut query);
    query.inner_join(
        Users::Table,
        Expr::col((Users::Table, Users::Id)).equals((Events::Table, Events::CreatedBy)),
    );

    query.and_where(expr(predicate));

    let order = match page.sort.direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    };
    query
        .order_by(sort_column(page.sort.key), order)
        .order_by((Events::Table, Events::Id), Order::Asc)
        .limit(u64::from(page.size))
        .offset(page.offset());

    query.to_string(PostgresQueryBuilder)
}

/// Total number of events matching the predicate, ignoring pagination.
pub fn count_statement(predicate: &Predicate) -> String {
    let mut query = Query::select();

    query.expr(Expr::col(Asterisk).count()).from(Events::Table);
    join_venues(&mut query);
    query.and_where(expr(predicate));

    query.to_string(PostgresQueryBuilder)
}
