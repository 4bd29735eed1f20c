use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    BlogPost, Booking, BookingStatus, ContactMessage, ContactStatus, Doctor, Faq, Role, User,
};

const DATE_FMT: &str = "%Y-%m-%d";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// True when the error is a SQLite constraint violation, e.g. the
/// partial unique index on live (date, time) slots or a duplicate email.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn now_str() -> String {
    Utc::now().naive_utc().format(DATETIME_FMT).to_string()
}

fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Users ──

pub fn create_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO users (id, name, email, password_hash, phone, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.id,
            user.name,
            user.email,
            user.password_hash,
            user.phone,
            user.role.as_str(),
            user.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

fn parse_user_row(row: &rusqlite::Row) -> anyhow::Result<User> {
    let created_at_str: String = row.get(6)?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        phone: row.get(4)?,
        role: Role::parse(&row.get::<_, String>(5)?),
        created_at: parse_datetime(&created_at_str),
    })
}

const USER_COLS: &str = "id, name, email, password_hash, phone, role, created_at";

pub fn get_user_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLS} FROM users WHERE id = ?1"),
        params![id],
        |row| Ok(parse_user_row(row)),
    );

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLS} FROM users WHERE email = ?1"),
        params![email],
        |row| Ok(parse_user_row(row)),
    );

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_users(conn: &Connection, page: i64, limit: i64) -> anyhow::Result<Vec<User>> {
    let offset = (page - 1) * limit;
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLS} FROM users WHERE role != 'admin'
         ORDER BY created_at DESC LIMIT ?1 OFFSET ?2"
    ))?;

    let rows = stmt.query_map(params![limit, offset], |row| Ok(parse_user_row(row)))?;

    let mut users = vec![];
    for row in rows {
        users.push(row??);
    }
    Ok(users)
}

pub fn count_users(conn: &Connection) -> anyhow::Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role != 'admin'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ── Bookings ──

const BOOKING_COLS: &str =
    "id, user_id, name, email, phone, service, date, time, status, notes, created_at, updated_at";

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO bookings ({BOOKING_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        ),
        params![
            booking.id,
            booking.user_id,
            booking.name,
            booking.email,
            booking.phone,
            booking.service,
            booking.date.format(DATE_FMT).to_string(),
            booking.time,
            booking.status.as_str(),
            booking.notes,
            booking.created_at.format(DATETIME_FMT).to_string(),
            booking.updated_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let date_str: String = row.get(6)?;
    let status_str: String = row.get(8)?;
    let created_at_str: String = row.get(10)?;
    let updated_at_str: String = row.get(11)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FMT)
        .unwrap_or_else(|_| Utc::now().date_naive());

    Ok(Booking {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        service: row.get(5)?,
        date,
        time: row.get(7)?,
        status: BookingStatus::parse(&status_str).unwrap_or(BookingStatus::Pending),
        notes: row.get(9)?,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_bookings_for_user(conn: &Connection, user_id: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLS} FROM bookings WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
    ))?;

    let rows = stmt.query_map(params![user_id], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_all_bookings(
    conn: &Connection,
    status_filter: Option<&str>,
    page: i64,
    limit: i64,
) -> anyhow::Result<Vec<Booking>> {
    let offset = (page - 1) * limit;

    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            format!(
                "SELECT {BOOKING_COLS} FROM bookings WHERE status = ?1
                 ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
            ),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
                Box::new(offset),
            ],
        ),
        None => (
            format!(
                "SELECT {BOOKING_COLS} FROM bookings
                 ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
            ),
            vec![
                Box::new(limit) as Box<dyn rusqlite::types::ToSql>,
                Box::new(offset),
            ],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn count_bookings(conn: &Connection, status_filter: Option<&str>) -> anyhow::Result<i64> {
    let count = match status_filter {
        Some(status) => conn.query_row(
            "SELECT COUNT(*) FROM bookings WHERE status = ?1",
            params![status],
            |row| row.get(0),
        )?,
        None => conn.query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))?,
    };
    Ok(count)
}

/// Time labels occupied on `date` by pending or confirmed bookings.
pub fn booked_times_for_date(conn: &Connection, date: NaiveDate) -> anyhow::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT time FROM bookings
         WHERE date = ?1 AND status IN ('pending', 'confirmed')
         ORDER BY time ASC",
    )?;

    let rows = stmt.query_map(params![date.format(DATE_FMT).to_string()], |row| {
        row.get::<_, String>(0)
    })?;

    let mut times = vec![];
    for row in rows {
        times.push(row?);
    }
    Ok(times)
}

/// Mutates status and/or notes; everything else is immutable after
/// creation. The partial unique slot index still applies, so moving a
/// cancelled booking back to a live status can fail on a retaken slot.
pub fn update_booking(
    conn: &Connection,
    id: &str,
    status: Option<BookingStatus>,
    notes: Option<&str>,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET
            status = COALESCE(?1, status),
            notes = COALESCE(?2, notes),
            updated_at = ?3
         WHERE id = ?4",
        params![status.map(|s| s.as_str()), notes, now_str(), id],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Contact messages ──

const CONTACT_COLS: &str =
    "id, name, email, phone, subject, message, status, admin_notes, replied_at, replied_by, created_at";

pub fn create_contact(conn: &Connection, msg: &ContactMessage) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO contact_messages ({CONTACT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
        ),
        params![
            msg.id,
            msg.name,
            msg.email,
            msg.phone,
            msg.subject,
            msg.message,
            msg.status.as_str(),
            msg.admin_notes,
            msg.replied_at.map(|t| t.format(DATETIME_FMT).to_string()),
            msg.replied_by,
            msg.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

fn parse_contact_row(row: &rusqlite::Row) -> anyhow::Result<ContactMessage> {
    let status_str: String = row.get(6)?;
    let replied_at_str: Option<String> = row.get(8)?;
    let created_at_str: String = row.get(10)?;

    Ok(ContactMessage {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        subject: row.get(4)?,
        message: row.get(5)?,
        status: ContactStatus::parse(&status_str).unwrap_or(ContactStatus::New),
        admin_notes: row.get(7)?,
        replied_at: replied_at_str.map(|s| parse_datetime(&s)),
        replied_by: row.get(9)?,
        created_at: parse_datetime(&created_at_str),
    })
}

pub fn get_contacts(
    conn: &Connection,
    status_filter: Option<&str>,
    page: i64,
    limit: i64,
) -> anyhow::Result<Vec<ContactMessage>> {
    let offset = (page - 1) * limit;

    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            format!(
                "SELECT {CONTACT_COLS} FROM contact_messages WHERE status = ?1
                 ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
            ),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
                Box::new(offset),
            ],
        ),
        None => (
            format!(
                "SELECT {CONTACT_COLS} FROM contact_messages
                 ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
            ),
            vec![
                Box::new(limit) as Box<dyn rusqlite::types::ToSql>,
                Box::new(offset),
            ],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_contact_row(row)))?;

    let mut contacts = vec![];
    for row in rows {
        contacts.push(row??);
    }
    Ok(contacts)
}

pub fn count_contacts(conn: &Connection, status_filter: Option<&str>) -> anyhow::Result<i64> {
    let count = match status_filter {
        Some(status) => conn.query_row(
            "SELECT COUNT(*) FROM contact_messages WHERE status = ?1",
            params![status],
            |row| row.get(0),
        )?,
        None => conn.query_row("SELECT COUNT(*) FROM contact_messages", [], |row| row.get(0))?,
    };
    Ok(count)
}

pub fn get_contact_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<ContactMessage>> {
    let result = conn.query_row(
        &format!("SELECT {CONTACT_COLS} FROM contact_messages WHERE id = ?1"),
        params![id],
        |row| Ok(parse_contact_row(row)),
    );

    match result {
        Ok(msg) => Ok(Some(msg?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_contact_status(
    conn: &Connection,
    id: &str,
    status: Option<ContactStatus>,
    admin_notes: Option<&str>,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE contact_messages SET
            status = COALESCE(?1, status),
            admin_notes = COALESCE(?2, admin_notes)
         WHERE id = ?3",
        params![status.map(|s| s.as_str()), admin_notes, id],
    )?;
    Ok(count > 0)
}

pub fn mark_contact_replied(
    conn: &Connection,
    id: &str,
    admin_notes: Option<&str>,
    replied_by: &str,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE contact_messages SET
            status = 'replied',
            admin_notes = COALESCE(?1, admin_notes),
            replied_at = ?2,
            replied_by = ?3
         WHERE id = ?4",
        params![admin_notes, now_str(), replied_by, id],
    )?;
    Ok(count > 0)
}

pub fn delete_contact(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM contact_messages WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── FAQs ──

const FAQ_COLS: &str = "id, question, answer, category, display_order, is_active, created_at";

pub fn create_faq(conn: &Connection, faq: &Faq) -> anyhow::Result<()> {
    conn.execute(
        &format!("INSERT INTO faqs ({FAQ_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
        params![
            faq.id,
            faq.question,
            faq.answer,
            faq.category,
            faq.display_order,
            faq.is_active as i32,
            faq.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

fn parse_faq_row(row: &rusqlite::Row) -> anyhow::Result<Faq> {
    let created_at_str: String = row.get(6)?;
    Ok(Faq {
        id: row.get(0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
        category: row.get(3)?,
        display_order: row.get(4)?,
        is_active: row.get::<_, i32>(5)? != 0,
        created_at: parse_datetime(&created_at_str),
    })
}

pub fn list_active_faqs(conn: &Connection, category: Option<&str>) -> anyhow::Result<Vec<Faq>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match category {
        Some(cat) => (
            format!(
                "SELECT {FAQ_COLS} FROM faqs WHERE is_active = 1 AND category = ?1
                 ORDER BY display_order ASC, created_at DESC"
            ),
            vec![Box::new(cat.to_string()) as Box<dyn rusqlite::types::ToSql>],
        ),
        None => (
            format!(
                "SELECT {FAQ_COLS} FROM faqs WHERE is_active = 1
                 ORDER BY display_order ASC, created_at DESC"
            ),
            vec![],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_faq_row(row)))?;

    let mut faqs = vec![];
    for row in rows {
        faqs.push(row??);
    }
    Ok(faqs)
}

pub fn get_faq_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Faq>> {
    let result = conn.query_row(
        &format!("SELECT {FAQ_COLS} FROM faqs WHERE id = ?1"),
        params![id],
        |row| Ok(parse_faq_row(row)),
    );

    match result {
        Ok(faq) => Ok(Some(faq?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_faq(conn: &Connection, faq: &Faq) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE faqs SET question = ?1, answer = ?2, category = ?3,
            display_order = ?4, is_active = ?5
         WHERE id = ?6",
        params![
            faq.question,
            faq.answer,
            faq.category,
            faq.display_order,
            faq.is_active as i32,
            faq.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_faq(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM faqs WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Doctors ──

const DOCTOR_COLS: &str =
    "id, name, specialization, bio, experience_years, education, profile_image, certificates, created_at";

pub fn create_doctor(conn: &Connection, doctor: &Doctor) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO doctors ({DOCTOR_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        params![
            doctor.id,
            doctor.name,
            doctor.specialization,
            doctor.bio,
            doctor.experience_years,
            doctor.education,
            doctor.profile_image,
            serde_json::to_string(&doctor.certificates)?,
            doctor.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

fn parse_doctor_row(row: &rusqlite::Row) -> anyhow::Result<Doctor> {
    let certificates_json: String = row.get(7)?;
    let created_at_str: String = row.get(8)?;

    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        specialization: row.get(2)?,
        bio: row.get(3)?,
        experience_years: row.get(4)?,
        education: row.get(5)?,
        profile_image: row.get(6)?,
        certificates: serde_json::from_str(&certificates_json).unwrap_or_default(),
        created_at: parse_datetime(&created_at_str),
    })
}

pub fn list_doctors(conn: &Connection) -> anyhow::Result<Vec<Doctor>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLS} FROM doctors ORDER BY name ASC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(parse_doctor_row(row)))?;

    let mut doctors = vec![];
    for row in rows {
        doctors.push(row??);
    }
    Ok(doctors)
}

pub fn get_doctor_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Doctor>> {
    let result = conn.query_row(
        &format!("SELECT {DOCTOR_COLS} FROM doctors WHERE id = ?1"),
        params![id],
        |row| Ok(parse_doctor_row(row)),
    );

    match result {
        Ok(doctor) => Ok(Some(doctor?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_doctor(conn: &Connection, doctor: &Doctor) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE doctors SET name = ?1, specialization = ?2, bio = ?3,
            experience_years = ?4, education = ?5, profile_image = ?6,
            certificates = ?7
         WHERE id = ?8",
        params![
            doctor.name,
            doctor.specialization,
            doctor.bio,
            doctor.experience_years,
            doctor.education,
            doctor.profile_image,
            serde_json::to_string(&doctor.certificates)?,
            doctor.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_doctor(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM doctors WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Blog posts ──

const POST_COLS: &str =
    "id, title, content, excerpt, category, tags, is_published, published_at, created_at, updated_at";

pub fn create_post(conn: &Connection, post: &BlogPost) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO blog_posts ({POST_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ),
        params![
            post.id,
            post.title,
            post.content,
            post.excerpt,
            post.category,
            serde_json::to_string(&post.tags)?,
            post.is_published as i32,
            post.published_at.map(|t| t.format(DATETIME_FMT).to_string()),
            post.created_at.format(DATETIME_FMT).to_string(),
            post.updated_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

fn parse_post_row(row: &rusqlite::Row) -> anyhow::Result<BlogPost> {
    let tags_json: String = row.get(5)?;
    let published_at_str: Option<String> = row.get(7)?;
    let created_at_str: String = row.get(8)?;
    let updated_at_str: String = row.get(9)?;

    Ok(BlogPost {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        excerpt: row.get(3)?,
        category: row.get(4)?,
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        is_published: row.get::<_, i32>(6)? != 0,
        published_at: published_at_str.map(|s| parse_datetime(&s)),
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

pub fn list_published_posts(
    conn: &Connection,
    category: Option<&str>,
    tag: Option<&str>,
    page: i64,
    limit: i64,
) -> anyhow::Result<Vec<BlogPost>> {
    let offset = (page - 1) * limit;

    let mut sql = format!("SELECT {POST_COLS} FROM blog_posts WHERE is_published = 1");
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];

    if let Some(cat) = category {
        params_vec.push(Box::new(cat.to_string()));
        sql.push_str(&format!(" AND category = ?{}", params_vec.len()));
    }
    if let Some(tag) = tag {
        // Tags are a JSON array of strings; match the quoted element.
        params_vec.push(Box::new(format!("%\"{tag}\"%")));
        sql.push_str(&format!(" AND tags LIKE ?{}", params_vec.len()));
    }

    params_vec.push(Box::new(limit));
    let limit_idx = params_vec.len();
    params_vec.push(Box::new(offset));
    sql.push_str(&format!(
        " ORDER BY published_at DESC LIMIT ?{limit_idx} OFFSET ?{}",
        params_vec.len()
    ));

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_post_row(row)))?;

    let mut posts = vec![];
    for row in rows {
        posts.push(row??);
    }
    Ok(posts)
}

pub fn count_published_posts(
    conn: &Connection,
    category: Option<&str>,
    tag: Option<&str>,
) -> anyhow::Result<i64> {
    let mut sql = "SELECT COUNT(*) FROM blog_posts WHERE is_published = 1".to_string();
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];

    if let Some(cat) = category {
        params_vec.push(Box::new(cat.to_string()));
        sql.push_str(&format!(" AND category = ?{}", params_vec.len()));
    }
    if let Some(tag) = tag {
        params_vec.push(Box::new(format!("%\"{tag}\"%")));
        sql.push_str(&format!(" AND tags LIKE ?{}", params_vec.len()));
    }

    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let count = conn.query_row(&sql, params_refs.as_slice(), |row| row.get(0))?;
    Ok(count)
}

pub fn get_post_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<BlogPost>> {
    let result = conn.query_row(
        &format!("SELECT {POST_COLS} FROM blog_posts WHERE id = ?1"),
        params![id],
        |row| Ok(parse_post_row(row)),
    );

    match result {
        Ok(post) => Ok(Some(post?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_post(conn: &Connection, post: &BlogPost) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE blog_posts SET title = ?1, content = ?2, excerpt = ?3, category = ?4,
            tags = ?5, is_published = ?6, published_at = ?7, updated_at = ?8
         WHERE id = ?9",
        params![
            post.title,
            post.content,
            post.excerpt,
            post.category,
            serde_json::to_string(&post.tags)?,
            post.is_published as i32,
            post.published_at.map(|t| t.format(DATETIME_FMT).to_string()),
            now_str(),
            post.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_post(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM blog_posts WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Dashboard ──

pub struct DashboardStats {
    pub total_users: i64,
    pub total_bookings: i64,
    pub pending_bookings: i64,
    pub confirmed_bookings: i64,
    pub total_posts: i64,
    pub monthly_bookings: i64,
    pub service_stats: Vec<(String, i64)>,
}

pub fn get_dashboard_stats(conn: &Connection) -> anyhow::Result<DashboardStats> {
    let total_users = count_users(conn)?;
    let total_bookings = count_bookings(conn, None)?;
    let pending_bookings = count_bookings(conn, Some("pending"))?;
    let confirmed_bookings = count_bookings(conn, Some("confirmed"))?;

    let total_posts: i64 = conn.query_row("SELECT COUNT(*) FROM blog_posts", [], |row| row.get(0))?;

    let month_start = Utc::now().format("%Y-%m-01 00:00:00").to_string();
    let monthly_bookings: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE created_at >= ?1",
        params![month_start],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT service, COUNT(*) FROM bookings GROUP BY service ORDER BY COUNT(*) DESC",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;

    let mut service_stats = vec![];
    for row in rows {
        service_stats.push(row?);
    }

    Ok(DashboardStats {
        total_users,
        total_bookings,
        pending_bookings,
        confirmed_bookings,
        total_posts,
        monthly_bookings,
        service_stats,
    })
}
