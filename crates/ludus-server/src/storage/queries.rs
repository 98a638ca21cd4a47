//! Database queries for the Ludus backend.

use ludus_core::db::{DatabaseError, unix_timestamp};

use super::db::GameDatabase;
use super::models::{Game, GameAttempt, Metrics, Student};

impl GameDatabase {
    // =========================================================================
    // Student queries
    // =========================================================================

    /// Create a new student together with their zeroed metrics row.
    ///
    /// Both inserts commit atomically: there is never a student without a
    /// metrics row.
    pub async fn create_student(
        &self,
        token: &str,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Student, DatabaseError> {
        let now = unix_timestamp();

        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "INSERT INTO students (token, name, email, password, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(token)
        .bind(name)
        .bind(email)
        .bind(password)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO metrics (token) VALUES (?)")
            .bind(token)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_student(token).await
    }

    /// Get a student by stoken.
    pub async fn get_student(&self, token: &str) -> Result<Student, DatabaseError> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE token = ?")
            .bind(token)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Student {token}")))
    }

    /// All students matching the given email and password exactly.
    ///
    /// Login requires exactly one match; the caller inspects the length.
    /// More than one row is possible because email is not unique.
    pub async fn find_students_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Vec<Student>, DatabaseError> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE email = ? AND password = ?",
        )
        .bind(email)
        .bind(password)
        .fetch_all(self.pool())
        .await?;

        Ok(students)
    }

    /// Whether a student with this exact (name, email, password) triple
    /// already exists. This is the signup duplicate check.
    pub async fn student_exists(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<bool, DatabaseError> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM students WHERE name = ? AND email = ? AND password = ?",
        )
        .bind(name)
        .bind(email)
        .bind(password)
        .fetch_one(self.pool())
        .await?;

        Ok(row.0 > 0)
    }

    // =========================================================================
    // Metrics queries
    // =========================================================================

    /// Get the metrics row for a stoken.
    pub async fn get_metrics(&self, token: &str) -> Result<Metrics, DatabaseError> {
        sqlx::query_as::<_, Metrics>("SELECT * FROM metrics WHERE token = ?")
            .bind(token)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Metrics for {token}")))
    }

    /// Append a game attempt and fold it into the student's metrics.
    ///
    /// The attempt insert and the counter update commit in one transaction;
    /// a partial update is never observable. Fails with `NotFound` before
    /// any write when the game id is not in the catalog.
    pub async fn record_game_attempt(
        &self,
        token: &str,
        gid: i64,
        got_correct: bool,
    ) -> Result<(), DatabaseError> {
        let game = self.get_game(gid).await?;
        let now = unix_timestamp();
        let correct = i64::from(got_correct);

        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "INSERT INTO game_attempts (token, gid, attempted_at, got_correct) VALUES (?, ?, ?, ?)",
        )
        .bind(token)
        .bind(gid)
        .bind(now)
        .bind(correct)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE metrics
             SET total_games_attempted = total_games_attempted + 1,
                 total_games_correct = total_games_correct + ?,
                 total_points_earned = total_points_earned + ?,
                 last_active = ?
             WHERE token = ?",
        )
        .bind(correct)
        .bind(game.correct_points * correct)
        .bind(now)
        .bind(token)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Zero a student's counters and clear `last_active`.
    ///
    /// Deliberately permissive: an unknown stoken is a no-op success.
    pub async fn reset_metrics(&self, token: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE metrics
             SET total_games_attempted = 0,
                 total_games_correct = 0,
                 total_points_earned = 0,
                 last_active = NULL
             WHERE token = ?",
        )
        .bind(token)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    // =========================================================================
    // Game catalog queries
    // =========================================================================

    /// Get a catalog entry by game id.
    pub async fn get_game(&self, gid: i64) -> Result<Game, DatabaseError> {
        sqlx::query_as::<_, Game>("SELECT * FROM games WHERE gid = ?")
            .bind(gid)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Game {gid}")))
    }

    /// List the full game catalog.
    pub async fn list_games(&self) -> Result<Vec<Game>, DatabaseError> {
        let games = sqlx::query_as::<_, Game>("SELECT * FROM games ORDER BY gid")
            .fetch_all(self.pool())
            .await?;

        Ok(games)
    }

    /// List a student's attempts, oldest first.
    pub async fn list_attempts(&self, token: &str) -> Result<Vec<GameAttempt>, DatabaseError> {
        let attempts = sqlx::query_as::<_, GameAttempt>(
            "SELECT * FROM game_attempts WHERE token = ? ORDER BY id",
        )
        .bind(token)
        .fetch_all(self.pool())
        .await?;

        Ok(attempts)
    }
}
