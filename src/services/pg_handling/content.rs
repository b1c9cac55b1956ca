use actix::Handler;
use chrono::Utc;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, QueryResult, RunQueryDsl};
use serde_json::json;

use crate::services::db_models::{FooterSettings, LegalPage};
use crate::services::db_utils::PgActor;
use crate::services::insertable::{FooterSettingsForm, NewLegalPage};
use crate::services::messages::{
    FetchFooter, FetchLegalPages, InitReport, InitializeContent, UpsertFooter, UpsertLegalPage,
};
use crate::services::pg_handling::establish_connection;

impl Handler<FetchLegalPages> for PgActor {
    type Result = QueryResult<Vec<LegalPage>>;

    fn handle(&mut self, _msg: FetchLegalPages, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::legal_pages::{dsl::legal_pages, updated_at};

        let mut conn = establish_connection(&self.0)?;

        legal_pages
            .order(updated_at.desc())
            .get_results::<LegalPage>(&mut conn)
    }
}

impl Handler<UpsertLegalPage> for PgActor {
    type Result = QueryResult<LegalPage>;

    fn handle(&mut self, msg: UpsertLegalPage, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::legal_pages::{dsl::legal_pages, page_type, sections, title, updated_at};

        let mut conn = establish_connection(&self.0)?;
        let now = Utc::now();

        diesel::insert_into(legal_pages)
            .values(NewLegalPage {
                page_type: msg.page_type,
                title: msg.title.clone(),
                sections: msg.sections.clone(),
                updated_at: now,
            })
            .on_conflict(page_type)
            .do_update()
            .set((
                title.eq(msg.title),
                sections.eq(msg.sections),
                updated_at.eq(now),
            ))
            .get_result::<LegalPage>(&mut conn)
    }
}

impl Handler<FetchFooter> for PgActor {
    type Result = QueryResult<Option<FooterSettings>>;

    fn handle(&mut self, _msg: FetchFooter, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::footer_settings::{dsl::footer_settings, id};

        let mut conn = establish_connection(&self.0)?;

        footer_settings
            .order(id.asc())
            .first::<FooterSettings>(&mut conn)
            .optional()
    }
}

impl Handler<UpsertFooter> for PgActor {
    type Result = QueryResult<FooterSettings>;

    fn handle(&mut self, msg: UpsertFooter, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::footer_settings::{dsl::footer_settings, id};

        let mut conn = establish_connection(&self.0)?;

        let existing = footer_settings
            .order(id.asc())
            .first::<FooterSettings>(&mut conn)
            .optional()?;

        match existing {
            Some(row) => diesel::update(footer_settings.find(row.id))
                .set(msg.0)
                .get_result::<FooterSettings>(&mut conn),
            None => diesel::insert_into(footer_settings)
                .values(msg.0)
                .get_result::<FooterSettings>(&mut conn),
        }
    }
}

impl Handler<InitializeContent> for PgActor {
    type Result = QueryResult<InitReport>;

    fn handle(&mut self, _msg: InitializeContent, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::footer_settings::{dsl::footer_settings, id};
        use crate::schema::legal_pages::{dsl::legal_pages, page_type};

        let mut conn = establish_connection(&self.0)?;

        let footer_exists = footer_settings
            .order(id.asc())
            .first::<FooterSettings>(&mut conn)
            .optional()?
            .is_some();

        let mut footer_created = false;
        if !footer_exists {
            diesel::insert_into(footer_settings)
                .values(default_footer())
                .execute(&mut conn)?;
            footer_created = true;
        }

        let mut legal_pages_created = 0;
        for page in default_legal_pages() {
            legal_pages_created += diesel::insert_into(legal_pages)
                .values(page)
                .on_conflict(page_type)
                .do_nothing()
                .execute(&mut conn)?;
        }

        Ok(InitReport {
            footer_created,
            legal_pages_created,
        })
    }
}

fn default_footer() -> FooterSettingsForm {
    FooterSettingsForm {
        company_name: "Port Antonio Resort".to_owned(),
        description: Some("Luxury beachfront resort with world-class dining".to_owned()),
        address: Some("Port Antonio, Mastita, Lebanon".to_owned()),
        phone: Some("+1 (876) 555-0123".to_owned()),
        email: Some("info@portantonio.com".to_owned()),
        dining_hours: Some("Dining Available 24/7".to_owned()),
        dining_location: Some("Main Restaurant & Beachside".to_owned()),
        social_links: json!({
            "facebook": "https://facebook.com/portantonio",
            "instagram": "https://instagram.com/portantonio",
            "twitter": "https://twitter.com/portantonio",
        }),
        updated_at: Utc::now(),
    }
}

fn default_legal_pages() -> Vec<NewLegalPage> {
    let now = Utc::now();
    let section = |id: &str, title: &str, content: &str, order: u32| {
        json!({ "id": id, "title": title, "content": content, "order": order })
    };

    vec![
        NewLegalPage {
            page_type: "privacy".to_owned(),
            title: "Privacy Policy".to_owned(),
            sections: json!([
                section(
                    "1",
                    "Information We Collect",
                    "We collect information you provide directly to us when you make \
                     reservations, place orders, or contact us for support.",
                    1,
                ),
                section(
                    "2",
                    "How We Use Your Information",
                    "We use your information to process your reservations and orders and \
                     to communicate with you about your visit.",
                    2,
                ),
                section(
                    "3",
                    "Data Protection",
                    "We do not sell, trade, or share your personal information with third \
                     parties without your explicit consent, except as required by law.",
                    3,
                ),
            ]),
            updated_at: now,
        },
        NewLegalPage {
            page_type: "terms".to_owned(),
            title: "Terms of Service".to_owned(),
            sections: json!([
                section(
                    "1",
                    "Reservations",
                    "Reservations are held for 15 minutes past the booked time. Late \
                     arrivals may be reseated subject to availability.",
                    1,
                ),
                section(
                    "2",
                    "Orders and Payment",
                    "All prices are listed in the menu currency and include applicable \
                     taxes unless stated otherwise.",
                    2,
                ),
            ]),
            updated_at: now,
        },
        NewLegalPage {
            page_type: "accessibility".to_owned(),
            title: "Accessibility Statement".to_owned(),
            sections: json!([
                section(
                    "1",
                    "Our Commitment",
                    "We are committed to providing a website and dining experience that \
                     is accessible to all guests.",
                    1,
                ),
            ]),
            updated_at: now,
        },
    ]
}
