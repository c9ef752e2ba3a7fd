//! Consolidated initial schema migration

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // 1. Create users table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Username, 64).not_null().unique_key())
                    .col(string_len(User::PasswordHash, 255).not_null())
                    .col(string_len(User::DisplayName, 255).not_null())
                    .col(string_len(User::Email, 255).not_null())
                    .col(string_len(User::Phone, 32).null())
                    .col(string_len(User::Role, 32).not_null().default("user"))
                    .col(boolean(User::IsActive).not_null().default(true))
                    .col(string_len(User::AvatarUrl, 255).null())
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(User::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_username")
                    .table(User::Table)
                    .col(User::Username)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 2. Create vehicle_classes table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(VehicleClass::Table)
                    .if_not_exists()
                    .col(uuid(VehicleClass::Id).primary_key())
                    .col(string_len(VehicleClass::Name, 255).not_null().unique_key())
                    .col(text(VehicleClass::Description).null())
                    .col(
                        timestamp_with_time_zone(VehicleClass::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 3. Create vehicles table
        // ============================================================
        // voter_number intentionally carries no unique constraint; the
        // update handler performs the uniqueness check (see vehicle entity).
        manager
            .create_table(
                Table::create()
                    .table(Vehicle::Table)
                    .if_not_exists()
                    .col(uuid(Vehicle::Id).primary_key())
                    .col(uuid(Vehicle::OwnerId).not_null())
                    .col(ColumnDef::new(Vehicle::ClassId).uuid().null())
                    .col(string_len(Vehicle::Make, 128).not_null())
                    .col(string_len(Vehicle::Model, 128).not_null())
                    .col(integer(Vehicle::Year).not_null())
                    .col(text(Vehicle::Description).null())
                    .col(string_len(Vehicle::VoterNumber, 32).null())
                    .col(string_len(Vehicle::PhotoUrl, 255).null())
                    .col(
                        timestamp_with_time_zone(Vehicle::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Vehicle::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicles_owner_id")
                            .from(Vehicle::Table, Vehicle::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicles_class_id")
                            .from(Vehicle::Table, Vehicle::ClassId)
                            .to(VehicleClass::Table, VehicleClass::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_vehicles_owner_id")
                    .table(Vehicle::Table)
                    .col(Vehicle::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_vehicles_voter_number")
                    .table(Vehicle::Table)
                    .col(Vehicle::VoterNumber)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 4. Create scores table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Score::Table)
                    .if_not_exists()
                    .col(uuid(Score::Id).primary_key())
                    .col(uuid(Score::VehicleId).not_null())
                    .col(uuid(Score::JudgeId).not_null())
                    .col(string_len(Score::Category, 64).not_null())
                    .col(integer(Score::Points).not_null())
                    .col(
                        timestamp_with_time_zone(Score::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scores_vehicle_id")
                            .from(Score::Table, Score::VehicleId)
                            .to(Vehicle::Table, Vehicle::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scores_judge_id")
                            .from(Score::Table, Score::JudgeId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scores_vehicle_id")
                    .table(Score::Table)
                    .col(Score::VehicleId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 5. Create products table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(uuid(Product::Id).primary_key())
                    .col(uuid(Product::VendorId).not_null())
                    .col(string_len(Product::Name, 255).not_null())
                    .col(text(Product::Description).null())
                    .col(big_integer(Product::PriceCents).not_null())
                    .col(
                        timestamp_with_time_zone(Product::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Product::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_vendor_id")
                            .from(Product::Table, Product::VendorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 6. Create specialty_votes table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(SpecialtyVote::Table)
                    .if_not_exists()
                    .col(uuid(SpecialtyVote::Id).primary_key())
                    .col(uuid(SpecialtyVote::VoterId).not_null())
                    .col(uuid(SpecialtyVote::VehicleId).not_null())
                    .col(string_len(SpecialtyVote::Award, 64).not_null())
                    .col(
                        timestamp_with_time_zone(SpecialtyVote::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_specialty_votes_voter_id")
                            .from(SpecialtyVote::Table, SpecialtyVote::VoterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_specialty_votes_vehicle_id")
                            .from(SpecialtyVote::Table, SpecialtyVote::VehicleId)
                            .to(Vehicle::Table, Vehicle::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_specialty_votes_vehicle_id")
                    .table(SpecialtyVote::Table)
                    .col(SpecialtyVote::VehicleId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 7. Create settings table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Setting::Table)
                    .if_not_exists()
                    .col(string_len(Setting::Key, 64).primary_key())
                    .col(text(Setting::Value).not_null())
                    .col(
                        timestamp_with_time_zone(Setting::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Setting::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SpecialtyVote::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Product::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Score::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicle::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VehicleClass::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Username,
    PasswordHash,
    DisplayName,
    Email,
    Phone,
    Role,
    IsActive,
    AvatarUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum VehicleClass {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Vehicle {
    Table,
    Id,
    OwnerId,
    ClassId,
    Make,
    Model,
    Year,
    Description,
    VoterNumber,
    PhotoUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Score {
    Table,
    Id,
    VehicleId,
    JudgeId,
    Category,
    Points,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    VendorId,
    Name,
    Description,
    PriceCents,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SpecialtyVote {
    Table,
    Id,
    VoterId,
    VehicleId,
    Award,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Setting {
    Table,
    Key,
    Value,
    UpdatedAt,
}
