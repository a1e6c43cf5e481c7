//! [`Client`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{client, Client},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `clients` table forming a [`Client`].
const COLUMNS: &str = "\
    id, name, company, \
    credit_amount, term_months, status, \
    created_at, commission, commission_paid";

/// Reads a [`Client`] out of the provided [`Row`] having all the [`COLUMNS`].
fn from_row(row: &Row) -> Client {
    Client {
        id: row.get("id"),
        name: row.get("name"),
        company: row.get("company"),
        credit_amount: row.get("credit_amount"),
        term: row.get("term_months"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        commission: row.get("commission"),
        commission_paid: row.get("commission_paid"),
    }
}

impl<C> Database<Select<By<Option<Client>, client::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Client>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM clients \
             WHERE id = $1::UUID"
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Client>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Client>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM clients \
             ORDER BY seq"
        );
        Ok(self
            .query(&sql, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Client>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(client): Insert<Client>,
    ) -> Result<Self::Ok, Self::Err> {
        let Client {
            id,
            name,
            company,
            credit_amount,
            term,
            status,
            created_at,
            commission,
            commission_paid,
        } = client;

        const SQL: &str = "\
            INSERT INTO clients (\
                id, name, company, \
                credit_amount, term_months, status, \
                created_at, commission, commission_paid\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, \
                $4::NUMERIC, $5::INT2, $6::INT2, \
                $7::TIMESTAMPTZ, $8::NUMERIC, $9::BOOL\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &company,
                &credit_amount,
                &term,
                &status,
                &created_at,
                &commission,
                &commission_paid,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Client>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(client): Update<Client>,
    ) -> Result<Self::Ok, Self::Err> {
        let Client {
            id,
            name,
            company,
            credit_amount,
            term,
            status,
            created_at,
            commission,
            commission_paid,
        } = client;

        // `seq` is kept untouched, so the position is preserved.
        const SQL: &str = "\
            INSERT INTO clients (\
                id, name, company, \
                credit_amount, term_months, status, \
                created_at, commission, commission_paid\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, \
                $4::NUMERIC, $5::INT2, $6::INT2, \
                $7::TIMESTAMPTZ, $8::NUMERIC, $9::BOOL\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                company = EXCLUDED.company, \
                credit_amount = EXCLUDED.credit_amount, \
                term_months = EXCLUDED.term_months, \
                status = EXCLUDED.status, \
                created_at = EXCLUDED.created_at, \
                commission = EXCLUDED.commission, \
                commission_paid = EXCLUDED.commission_paid";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &company,
                &credit_amount,
                &term,
                &status,
                &created_at,
                &commission,
                &commission_paid,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Option<Client>, client::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Option<Client>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "DELETE FROM clients \
             WHERE id = $1::UUID \
             RETURNING {COLUMNS}"
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Delete<By<Vec<Client>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Delete<By<Vec<Client>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "DELETE FROM clients";
        self.exec(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Client, client::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Client, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: client::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM clients \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
