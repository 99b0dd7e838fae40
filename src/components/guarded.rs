//! Route rendering behind the navigation guard.
//!
//! [`RouteOutlet`] resolves the current location against the route table and
//! wraps the page in [`Guarded`], which runs the guard before showing it. In-app
//! links use [`GuardedLink`] so a blocked navigation never changes the URL.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::app::NavigatorHandle;
use crate::net::api::ApiError;
use crate::pages::{
    admin_users::AdminUsersPage, forbidden::ForbiddenPage, home::HomePage, login::LoginPage,
    not_found::NotFoundPage, profile::ProfilePage,
};
use crate::routing::guard::NavigationDecision;
use crate::routing::table::{RouteDescriptor, ViewId};
use crate::state::auth::AuthState;

/// Renders the route matching the current location.
#[component]
pub fn RouteOutlet() -> impl IntoView {
    let navigator = expect_context::<NavigatorHandle>();
    let location = use_location();

    move || {
        let path = location.pathname.get();
        match navigator.with_value(|n| n.table().lookup(&path).cloned()) {
            Some(route) => view! { <Guarded route=route/> }.into_any(),
            None => view! { <NotFoundPage/> }.into_any(),
        }
    }
}

/// Runs the guard for `route` and renders its page only on `Proceed`.
///
/// The check re-runs whenever the signed-in user changes, so signing out on a
/// protected page redirects away from it.
#[component]
pub fn Guarded(route: RouteDescriptor) -> impl IntoView {
    let navigator = expect_context::<NavigatorHandle>();
    let auth = expect_context::<ReadSignal<AuthState>>();
    let navigate = use_navigate();

    let uid = Memo::new(move |_| auth.with(|s| s.session.as_ref().map(|s| s.uid.clone())));
    let view_id = route.view;
    let path = route.path.clone();

    let decision = LocalResource::new(move || {
        uid.track();
        let route = route.clone();
        let (gate, approved) = navigator.with_value(|n| (n.gate(), n.take_approval(&route.path)));
        async move {
            if approved {
                NavigationDecision::Proceed
            } else {
                gate.check(&route).await
            }
        }
    });

    Effect::new(move || match decision.get() {
        Some(NavigationDecision::Proceed) => navigator.with_value(|n| n.sync_location(&path)),
        Some(NavigationDecision::Redirect(to)) => {
            navigate(&to, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
        Some(NavigationDecision::Block) | None => {}
    });

    view! {
        <Suspense fallback=move || view! { <p class="guard__pending">"Checking access..."</p> }>
            {move || {
                decision
                    .get()
                    .map(|d| match d {
                        NavigationDecision::Proceed => page(view_id),
                        NavigationDecision::Redirect(_) => ().into_any(),
                        NavigationDecision::Block => {
                            view! {
                                <div class="guard__blocked">
                                    <p>"We couldn't verify your access right now."</p>
                                    <button class="btn" on:click=move |_| decision.refetch()>
                                        "Try again"
                                    </button>
                                </div>
                            }
                                .into_any()
                        }
                    })
            }}
        </Suspense>
    }
}

/// Send the user to the login route when `result` resolves to a rejected
/// credential.
pub fn redirect_on_unauthenticated<T: Clone + 'static>(result: LocalResource<Result<T, ApiError>>) {
    let navigator = expect_context::<NavigatorHandle>();
    let navigate = use_navigate();
    let login = navigator.with_value(|n| n.table().login().path.clone());

    Effect::new(move || {
        if let Some(Err(e)) = result.get() {
            if e.is_unauthenticated() {
                log::info!("credentials rejected ({e}), redirecting to {login}");
                navigate(&login, NavigateOptions { replace: true, ..NavigateOptions::default() });
            }
        }
    });
}

fn page(view: ViewId) -> AnyView {
    match view {
        ViewId::Home => view! { <HomePage/> }.into_any(),
        ViewId::Login => view! { <LoginPage/> }.into_any(),
        ViewId::Forbidden => view! { <ForbiddenPage/> }.into_any(),
        ViewId::Profile => view! { <ProfilePage/> }.into_any(),
        ViewId::AdminUsers => view! { <AdminUsersPage/> }.into_any(),
    }
}

/// Anchor that runs the navigator before touching the URL.
///
/// Blocked and superseded navigations leave the location unchanged.
#[component]
pub fn GuardedLink(
    #[prop(into)] href: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let navigator = expect_context::<NavigatorHandle>();
    let navigate = use_navigate();
    let target = href.clone();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        let nav = navigator.get_value();
        let navigate = navigate.clone();
        let target = target.clone();
        leptos::task::spawn_local(async move {
            let outcome = nav.navigate(&target).await;
            match outcome.destination() {
                Some(dest) => navigate(dest, NavigateOptions::default()),
                None => log::debug!("navigation to {target} not applied: {outcome:?}"),
            }
        });
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
