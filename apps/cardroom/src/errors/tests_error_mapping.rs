use crate::error::AppError;
use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;

#[test]
fn move_violations_collapse_to_invalid_move() {
    for kind in [
        ValidationKind::OutOfTurn,
        ValidationKind::CardNotInHand,
        ValidationKind::MustFollowSuit,
    ] {
        let err: AppError = DomainError::validation(kind, "nope").into();
        assert_eq!(err.code(), ErrorCode::InvalidMove);
        assert_eq!(err.detail(), "nope");
    }
}

#[test]
fn lobby_and_lookup_errors_map_to_their_codes() {
    let cases = [
        (
            DomainError::not_found(NotFoundKind::Room, "r"),
            ErrorCode::RoomNotFound,
        ),
        (DomainError::player_not_found("p1"), ErrorCode::PlayerNotFound),
        (
            DomainError::conflict(ConflictKind::RoomFull, "full"),
            ErrorCode::RoomFull,
        ),
        (
            DomainError::validation(ValidationKind::NotWaiting, "started"),
            ErrorCode::GameNotInWaitingState,
        ),
        (
            DomainError::conflict(ConflictKind::AlreadyVoted, "twice"),
            ErrorCode::AlreadyVoted,
        ),
        (
            DomainError::validation(ValidationKind::KnockNotEligible, "dw"),
            ErrorCode::KnockNotEligible,
        ),
        (
            DomainError::validation(ValidationKind::InvalidMeld, "meld"),
            ErrorCode::InvalidMeld,
        ),
        (
            DomainError::infra(InfraErrorKind::InvariantViolation, "52"),
            ErrorCode::InvariantViolation,
        ),
    ];
    for (domain, expected) in cases {
        let app: AppError = domain.into();
        assert_eq!(app.code(), expected);
    }
}

#[test]
fn invariant_violation_is_internal() {
    let app: AppError = DomainError::invariant("card count").into();
    assert!(matches!(app, AppError::Internal { .. }));
}
