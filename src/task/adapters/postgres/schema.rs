//! Diesel schema for task and history persistence.

diesel::table! {
    /// Task records with create-time classification output.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Category storage name.
        #[max_length = 50]
        category -> Varchar,
        /// Priority storage name.
        #[max_length = 50]
        priority -> Varchar,
        /// Workflow status storage name.
        #[max_length = 50]
        status -> Varchar,
        /// Optional assignee.
        #[max_length = 255]
        assigned_to -> Nullable<Varchar>,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Entity summary extracted at creation.
        extracted_entities -> Jsonb,
        /// Suggested actions assigned at creation.
        suggested_actions -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit history, cascade-deleted with the owning task.
    task_history (id) {
        /// History row identifier.
        id -> Uuid,
        /// Owning task identifier.
        task_id -> Uuid,
        /// Mutation kind storage name.
        #[max_length = 50]
        action -> Varchar,
        /// Old values for updated fields, absent for creations.
        old_value -> Nullable<Jsonb>,
        /// New values for created or updated fields.
        new_value -> Nullable<Jsonb>,
        /// Optional actor identifier.
        #[max_length = 255]
        changed_by -> Nullable<Varchar>,
        /// Mutation timestamp.
        changed_at -> Timestamptz,
    }
}

diesel::joinable!(task_history -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_history);
