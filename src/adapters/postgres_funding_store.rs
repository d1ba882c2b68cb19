//! Postgres implementation of FundingStore.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::domain::{AppliedContribution, CampaignSnapshot, Contribution, Donation, WalletSnapshot};
use crate::ports::{FundingStore, RepositoryError, RepositoryResult};

/// Postgres-backed funding store.
#[derive(Clone)]
pub struct PostgresFundingStore {
    pool: PgPool,
}

impl PostgresFundingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FundingStore for PostgresFundingStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_campaign(&self, campaign_id: i64) -> RepositoryResult<Option<CampaignSnapshot>> {
        let row = sqlx::query_as::<_, CampaignRow>(
            r#"
            SELECT c.campaign_id, c.user_id, c.title, c.target_amt, c.status,
                c.start_date, c.end_date,
                w.wallet_id, w.amount, w.cur_balance
            FROM campaigns c
            LEFT JOIN wallets w ON w.wallet_id = c.wallet_id
            WHERE c.campaign_id = $1
            "#,
        )
        .bind(campaign_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CampaignRow::into_domain).transpose()
    }

    async fn try_apply(&self, contribution: &Contribution) -> RepositoryResult<AppliedContribution> {
        let mut tx = self.pool.begin().await?;

        // Compare-and-swap on the raised amount, with the target read from the
        // campaign row in the same statement. Concurrent writers serialize on
        // the wallet row lock and re-check the predicate against the new value.
        let wallet = sqlx::query_as::<_, WalletRow>(
            r#"
            UPDATE wallets w
            SET amount = w.amount + $3,
                cur_balance = w.cur_balance + $3
            FROM campaigns c
            WHERE c.campaign_id = $1
              AND c.wallet_id = w.wallet_id
              AND w.wallet_id = $2
              AND w.amount = $4
              AND w.amount + $3 <= c.target_amt
            RETURNING w.wallet_id, w.amount, w.cur_balance
            "#,
        )
        .bind(contribution.campaign_id)
        .bind(contribution.wallet_id)
        .bind(&contribution.amount)
        .bind(&contribution.expected_amount)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(wallet) = wallet else {
            tx.rollback().await?;
            return Err(RepositoryError::Conflict(format!(
                "wallet {} changed since it was read",
                contribution.wallet_id
            )));
        };

        let donation = sqlx::query_as::<_, DonationRow>(
            r#"
            INSERT INTO donations (amount, campaign_id, wallet_id, donation_time)
            VALUES ($1, $2, $3, $4)
            RETURNING donation_id, amount, campaign_id, wallet_id, donation_time
            "#,
        )
        .bind(&contribution.amount)
        .bind(contribution.campaign_id)
        .bind(contribution.wallet_id)
        .bind(contribution.donation_time)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(AppliedContribution {
            donation: donation.into_domain(),
            wallet: wallet.into_domain(),
        })
    }

    async fn list_donations(
        &self,
        campaign_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Donation>> {
        let rows = sqlx::query_as::<_, DonationRow>(
            r#"
            SELECT donation_id, amount, campaign_id, wallet_id, donation_time
            FROM donations
            WHERE campaign_id = $1
            ORDER BY donation_time DESC, donation_id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(campaign_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DonationRow::into_domain).collect())
    }
}

/// Internal row types for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct CampaignRow {
    campaign_id: i64,
    user_id: i64,
    title: String,
    target_amt: BigDecimal,
    status: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    wallet_id: Option<i64>,
    amount: Option<BigDecimal>,
    cur_balance: Option<BigDecimal>,
}

impl CampaignRow {
    fn into_domain(self) -> RepositoryResult<CampaignSnapshot> {
        let status = self
            .status
            .parse()
            .map_err(|e| RepositoryError::InvalidData(format!("campaign {}: {}", self.campaign_id, e)))?;

        let wallet = match (self.wallet_id, self.amount, self.cur_balance) {
            (Some(wallet_id), Some(amount), Some(cur_balance)) => Some(WalletSnapshot {
                wallet_id,
                amount,
                cur_balance,
            }),
            (None, _, _) => None,
            (Some(wallet_id), _, _) => {
                return Err(RepositoryError::InvalidData(format!(
                    "campaign {} references missing wallet {}",
                    self.campaign_id, wallet_id
                )))
            }
        };

        Ok(CampaignSnapshot {
            campaign_id: self.campaign_id,
            user_id: self.user_id,
            title: self.title,
            target_amt: self.target_amt,
            status,
            start_date: self.start_date,
            end_date: self.end_date,
            wallet,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WalletRow {
    wallet_id: i64,
    amount: BigDecimal,
    cur_balance: BigDecimal,
}

impl WalletRow {
    fn into_domain(self) -> WalletSnapshot {
        WalletSnapshot {
            wallet_id: self.wallet_id,
            amount: self.amount,
            cur_balance: self.cur_balance,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DonationRow {
    donation_id: i64,
    amount: BigDecimal,
    campaign_id: i64,
    wallet_id: i64,
    donation_time: DateTime<Utc>,
}

impl DonationRow {
    fn into_domain(self) -> Donation {
        Donation {
            donation_id: self.donation_id,
            amount: self.amount,
            campaign_id: self.campaign_id,
            wallet_id: self.wallet_id,
            donation_time: self.donation_time,
        }
    }
}
