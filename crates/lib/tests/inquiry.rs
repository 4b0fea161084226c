mod common;

use common::{Canned, FakeRepository, ok};
use serde_json::json;
use tawseek_misr::{
    BookingInquiry, Error, Language, ReservationFilter, TawseekApi, endpoints,
    filter_reservations, format_reservation_date, format_reservation_time,
    sort_reservations_by_date,
};

fn reservations() -> Canned {
    ok(json!([
        {
            "orgUnitId": 12, "orgUnitName": "مكتب توثيق مدينة نصر", "orgVipFlag": "1",
            "transCategoryDesc": "توثيق", "transTypeDesc": "توكيل عام", "queId": "A-17",
            "reservationDate": "2023-09-20 12:00:00.0", "reservationTime": "2023-09-20 12:00:00.0"
        },
        {
            "orgUnitId": 40, "orgUnitName": "مكتب توثيق سموحة", "orgVipFlag": "2",
            "transCategoryDesc": "شهر عقاري", "transTypeDesc": "تسجيل", "queId": "B-3",
            "reservationDate": "2999-01-05 00:00:00.0", "reservationTime": "الفترة الصباحية"
        }
    ]))
}

#[tokio::test]
async fn national_id_accepted_on_status_one() {
    let repo = FakeRepository::new().with(
        endpoints::VALIDATE_NATIONAL_ID,
        Canned::Json(json!({ "statusCode": "1", "description": "" })),
    );
    let api = TawseekApi::new(repo);
    let inquiry = BookingInquiry::new(&api, Language::Arabic);
    assert!(inquiry.validate_national_id_with_api("29001011234567").await.unwrap());

    let sent = api.repository().calls_to(endpoints::VALIDATE_NATIONAL_ID);
    assert_eq!(sent[0].as_ref().unwrap()["nationalId"], "29001011234567");
}

#[tokio::test]
async fn national_id_rejection_carries_server_message() {
    let repo = FakeRepository::new().with(
        endpoints::VALIDATE_NATIONAL_ID,
        Canned::Json(json!({ "statusCode": "200", "description": "not a citizen record" })),
    );
    let api = TawseekApi::new(repo);
    let inquiry = BookingInquiry::new(&api, Language::English);

    match inquiry.validate_national_id_with_api("29001011234567").await {
        Err(Error::Domain { code, message }) => {
            assert_eq!(code, "200");
            assert_eq!(message, "not a citizen record");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn fetch_then_present() {
    let repo = FakeRepository::new().with(endpoints::INQUIRE_RESERVATIONS, reservations());
    let api = TawseekApi::new(repo);
    let inquiry = BookingInquiry::new(&api, Language::Arabic);

    let list = inquiry.fetch_reservations("29001011234567").await.unwrap();
    assert_eq!(list.len(), 2);

    let sorted = sort_reservations_by_date(&list);
    assert_eq!(sorted[0].que_id, "B-3");
    assert_eq!(list[0].que_id, "A-17");

    let upcoming = filter_reservations(&list, ReservationFilter::Upcoming);
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].que_id, "B-3");

    let first = &list[0];
    assert_eq!(format_reservation_date(&first.reservation_date), "20/09/2023");
    assert_eq!(
        format_reservation_time(&first.reservation_time, first.org_vip_flag.as_str()),
        "12:00 م"
    );
    let second = &list[1];
    assert_eq!(
        format_reservation_time(&second.reservation_time, second.org_vip_flag.as_str()),
        "الفترة الصباحية"
    );
}

#[tokio::test]
async fn inquiry_requires_status_200() {
    let repo = FakeRepository::new().with(
        endpoints::INQUIRE_RESERVATIONS,
        Canned::Json(json!({ "statusCode": "404", "description": "لا توجد حجوزات" })),
    );
    let api = TawseekApi::new(repo);
    let inquiry = BookingInquiry::new(&api, Language::Arabic);

    let err = inquiry.fetch_reservations("29001011234567").await.unwrap_err();
    assert_eq!(err.user_message(Language::Arabic), "لا توجد حجوزات");
}
