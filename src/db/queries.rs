use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingPayload, BookingStatus, CarDetails, CarType, ServiceType};

const BOOKING_COLUMNS: &str = "id, customer_name, car_make, car_model, car_year, car_type, \
     service_type, date, timeslot, duration, price, status, rating, addons, created_at, updated_at";

const DATE_FMT: &str = "%Y-%m-%d";
const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Optional listing filters. Equality filters are matched as raw strings so
/// an unknown value simply matches nothing instead of erroring.
#[derive(Debug, Default, Clone)]
pub struct BookingFilter {
    pub service_type: Option<String>,
    pub car_type: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

fn build_filter(filter: &BookingFilter) -> (String, Vec<Box<dyn ToSql>>) {
    let mut clauses: Vec<String> = vec![];
    let mut params_vec: Vec<Box<dyn ToSql>> = vec![];

    if let Some(service_type) = &filter.service_type {
        params_vec.push(Box::new(service_type.clone()));
        clauses.push(format!("service_type = ?{}", params_vec.len()));
    }
    if let Some(car_type) = &filter.car_type {
        params_vec.push(Box::new(car_type.clone()));
        clauses.push(format!("car_type = ?{}", params_vec.len()));
    }
    if let Some(status) = &filter.status {
        params_vec.push(Box::new(status.clone()));
        clauses.push(format!("status = ?{}", params_vec.len()));
    }
    if let Some(from) = &filter.date_from {
        params_vec.push(Box::new(from.format(DATE_FMT).to_string()));
        clauses.push(format!("date >= ?{}", params_vec.len()));
    }
    if let Some(to) = &filter.date_to {
        params_vec.push(Box::new(to.format(DATE_FMT).to_string()));
        clauses.push(format!("date <= ?{}", params_vec.len()));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    (where_clause, params_vec)
}

/// Filtered, paginated listing sorted by appointment date descending.
/// Returns the page of records plus the total number of matches.
pub fn list_bookings(
    conn: &Connection,
    filter: &BookingFilter,
    page: i64,
    limit: i64,
) -> anyhow::Result<(Vec<Booking>, i64)> {
    let (where_clause, mut params_vec) = build_filter(filter);

    let total: i64 = {
        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.query_row(
            &format!("SELECT COUNT(*) FROM bookings{where_clause}"),
            params_refs.as_slice(),
            |row| row.get(0),
        )?
    };

    params_vec.push(Box::new(limit));
    let limit_idx = params_vec.len();
    params_vec.push(Box::new((page - 1) * limit));
    let offset_idx = params_vec.len();

    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings{where_clause} \
         ORDER BY date DESC, created_at DESC LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok((bookings, total))
}

/// Case-insensitive substring match across customer name, car make and car
/// model, sorted by appointment date descending.
pub fn search_bookings(conn: &Connection, q: &str) -> anyhow::Result<Vec<Booking>> {
    let pattern = format!("%{}%", escape_like(q));

    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings \
         WHERE customer_name LIKE ?1 ESCAPE '\\' \
            OR car_make LIKE ?1 ESCAPE '\\' \
            OR car_model LIKE ?1 ESCAPE '\\' \
         ORDER BY date DESC, created_at DESC"
    ))?;

    let rows = stmt.query_map(params![pattern], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

// LIKE treats % and _ as wildcards; a literal search needle must not.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    let addons = serde_json::to_string(&booking.addons)?;

    conn.execute(
        "INSERT INTO bookings (id, customer_name, car_make, car_model, car_year, car_type, \
         service_type, date, timeslot, duration, price, status, rating, addons, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            booking.id,
            booking.customer_name,
            booking.car_details.make,
            booking.car_details.model,
            booking.car_details.year,
            booking.car_details.car_type.as_str(),
            booking.service_type.as_str(),
            booking.date.format(DATE_FMT).to_string(),
            booking.timeslot,
            booking.duration,
            booking.price,
            booking.status.as_str(),
            booking.rating,
            addons,
            booking.created_at.format(TIMESTAMP_FMT).to_string(),
            booking.updated_at.format(TIMESTAMP_FMT).to_string(),
        ],
    )?;
    Ok(())
}

/// Full replacement of every client-supplied field; `created_at` is kept and
/// `updated_at` refreshed. Returns false when no row has that id.
pub fn update_booking(
    conn: &Connection,
    id: &str,
    payload: &BookingPayload,
    now: NaiveDateTime,
) -> anyhow::Result<bool> {
    let addons = serde_json::to_string(&payload.addons)?;

    let count = conn.execute(
        "UPDATE bookings SET customer_name = ?1, car_make = ?2, car_model = ?3, car_year = ?4, \
         car_type = ?5, service_type = ?6, date = ?7, timeslot = ?8, duration = ?9, price = ?10, \
         status = ?11, rating = ?12, addons = ?13, updated_at = ?14 WHERE id = ?15",
        params![
            payload.customer_name,
            payload.car_details.make,
            payload.car_details.model,
            payload.car_details.year,
            payload.car_details.car_type.as_str(),
            payload.service_type.as_str(),
            payload.date.format(DATE_FMT).to_string(),
            payload.timeslot,
            payload.duration,
            payload.price,
            payload.status.as_str(),
            payload.rating,
            addons,
            now.format(TIMESTAMP_FMT).to_string(),
            id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn count_bookings(conn: &Connection) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))?;
    Ok(count)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let customer_name: String = row.get(1)?;
    let make: String = row.get(2)?;
    let model: String = row.get(3)?;
    let year: i64 = row.get(4)?;
    let car_type_str: String = row.get(5)?;
    let service_type_str: String = row.get(6)?;
    let date_str: String = row.get(7)?;
    let timeslot: String = row.get(8)?;
    let duration: i64 = row.get(9)?;
    let price: f64 = row.get(10)?;
    let status_str: String = row.get(11)?;
    let rating: Option<i64> = row.get(12)?;
    let addons_json: String = row.get(13)?;
    let created_at_str: String = row.get(14)?;
    let updated_at_str: String = row.get(15)?;

    let car_type = CarType::parse(&car_type_str)
        .ok_or_else(|| anyhow::anyhow!("unknown car type in row {id}: {car_type_str}"))?;
    let service_type = ServiceType::parse(&service_type_str)
        .ok_or_else(|| anyhow::anyhow!("unknown service type in row {id}: {service_type_str}"))?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FMT)?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, TIMESTAMP_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        customer_name,
        car_details: CarDetails {
            make,
            model,
            year,
            car_type,
        },
        service_type,
        date,
        timeslot,
        duration,
        price,
        status: BookingStatus::parse(&status_str).unwrap_or_default(),
        rating,
        addons: serde_json::from_str(&addons_json).unwrap_or_default(),
        created_at,
        updated_at,
    })
}
