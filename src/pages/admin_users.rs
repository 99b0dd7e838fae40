//! Administrator-only user list.

use leptos::prelude::*;

use crate::components::guarded::redirect_on_unauthenticated;
use crate::net::api::AdminUser;
#[cfg(not(feature = "csr"))]
use crate::net::api::ApiError;

/// Lists every user; each row can be deleted.
#[component]
pub fn AdminUsersPage() -> impl IntoView {
    #[cfg(feature = "csr")]
    let api = expect_context::<StoredValue<crate::net::api::ApiClient, LocalStorage>>();

    let users = LocalResource::new(move || {
        #[cfg(feature = "csr")]
        let api = api.get_value();
        async move {
            #[cfg(feature = "csr")]
            {
                api.fetch_admin_users().await
            }
            #[cfg(not(feature = "csr"))]
            {
                Ok::<Vec<AdminUser>, ApiError>(Vec::new())
            }
        }
    });
    redirect_on_unauthenticated(users);

    let on_delete = Callback::new(move |uid: String| {
        #[cfg(feature = "csr")]
        {
            let api = api.get_value();
            leptos::task::spawn_local(async move {
                match api.delete_admin_user(&uid).await {
                    Ok(()) => users.refetch(),
                    Err(e) => log::warn!("delete user {uid} failed: {e}"),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = uid;
        }
    });

    view! {
        <div class="admin-users-page">
            <h1>"Users"</h1>
            <Suspense fallback=move || view! { <p>"Loading users..."</p> }>
                {move || {
                    users
                        .get()
                        .map(|result| match result {
                            Ok(list) if list.is_empty() => view! { <p>"No users."</p> }.into_any(),
                            Ok(list) => {
                                view! {
                                    <table class="admin-users-page__table">
                                        <thead>
                                            <tr>
                                                <th>"UID"</th>
                                                <th>"Email"</th>
                                                <th>"Name"</th>
                                                <th>"Role"</th>
                                                <th></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {list
                                                .into_iter()
                                                .map(|user| view! { <UserRow user=user on_delete=on_delete/> })
                                                .collect::<Vec<_>>()}
                                        </tbody>
                                    </table>
                                }
                                    .into_any()
                            }
                            Err(e) => view! { <p class="admin-users-page__error">{e.to_string()}</p> }.into_any(),
                        })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn UserRow(user: AdminUser, on_delete: Callback<String>) -> impl IntoView {
    let uid = user.uid.clone();
    let role = if user.is_admin { "admin" } else { "user" };

    view! {
        <tr class:admin-users-page__row--disabled=user.disabled>
            <td>{user.uid}</td>
            <td>{user.email.unwrap_or_default()}</td>
            <td>{user.display_name.unwrap_or_default()}</td>
            <td>{role}</td>
            <td>
                <button class="btn btn--danger" on:click=move |_| on_delete.run(uid.clone())>
                    "Delete"
                </button>
            </td>
        </tr>
    }
}
