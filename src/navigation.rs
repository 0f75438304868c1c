//! The navigation bar shown at the top of every page for logged in users.
//!
//! On small screens the links move to a bar fixed to the bottom of the
//! screen, with the less used links tucked into a "More" menu.

use maud::{Markup, html};

use crate::endpoints;

/// A link in the navigation bar.
///
/// Only one link should be current at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
    /// Whether the link goes in the "More" menu on small screens.
    in_more_menu: bool,
}

const DESKTOP_LINK_STYLE: &str = "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100 \
    lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0 \
    dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700 \
    dark:hover:text-white lg:dark:hover:bg-transparent";
const DESKTOP_CURRENT_LINK_STYLE: &str = "block py-2 px-3 text-white bg-blue-700 rounded-sm \
    lg:bg-transparent lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500";
const MOBILE_LINK_STYLE: &str = "flex w-full min-w-0 items-center justify-center rounded-lg \
    px-2.5 py-2 text-xs font-semibold leading-tight text-gray-600 sm:px-4 sm:text-sm \
    hover:bg-blue-50/70 hover:text-blue-700 dark:text-gray-300 \
    dark:hover:bg-blue-900/20 dark:hover:text-blue-200";
const MOBILE_CURRENT_LINK_STYLE: &str = "flex w-full min-w-0 items-center justify-center \
    rounded-lg bg-blue-50 px-2.5 py-2 text-xs font-semibold leading-tight text-blue-700 \
    shadow-sm sm:px-4 sm:text-sm dark:bg-blue-900/30 dark:text-blue-200";
const MORE_ITEM_STYLE: &str = "block rounded-lg px-3 py-2 text-gray-700 hover:bg-gray-100 \
    hover:text-blue-700 dark:text-gray-200 dark:hover:bg-gray-800/80 dark:hover:text-blue-200";
const MORE_CURRENT_ITEM_STYLE: &str = "block rounded-lg bg-blue-50 px-3 py-2 text-blue-700 \
    dark:bg-blue-900/30 dark:text-blue-200";

impl Link<'_> {
    fn into_desktop_html(self) -> Markup {
        let style = if self.is_current {
            DESKTOP_CURRENT_LINK_STYLE
        } else {
            DESKTOP_LINK_STYLE
        };

        html!( a href=(self.url) class=(style) { (self.title) } )
    }

    fn mobile_html(&self) -> Markup {
        let style = if self.is_current {
            MOBILE_CURRENT_LINK_STYLE
        } else {
            MOBILE_LINK_STYLE
        };

        html! {
            a href=(self.url) class=(style) aria-current=[self.is_current.then_some("page")]
            {
                span class="truncate" { (self.title) }
            }
        }
    }

    fn more_menu_html(&self) -> Markup {
        let style = if self.is_current {
            MORE_CURRENT_ITEM_STYLE
        } else {
            MORE_ITEM_STYLE
        };

        html! {
            a href=(self.url) class=(style) aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        }
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let link = |url: &'static str, title: &'static str, in_more_menu: bool| Link {
            url,
            title,
            is_current: active_endpoint == url,
            in_more_menu,
        };

        let links = vec![
            link(endpoints::DASHBOARD_VIEW, "Dashboard", false),
            link(endpoints::TRANSACTIONS_VIEW, "Transactions", false),
            link(endpoints::BUDGETS_VIEW, "Budgets", false),
            link(endpoints::REPORT, "Report", true),
            link(endpoints::PROFILE_VIEW, "Profile", true),
            Link {
                url: endpoints::LOG_OUT,
                title: "Log out",
                is_current: false,
                in_more_menu: true,
            },
        ];

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        let links = self.links;
        let more_is_active = links
            .iter()
            .any(|link| link.in_more_menu && link.is_current);
        let more_summary_style = if more_is_active {
            MOBILE_CURRENT_LINK_STYLE
        } else {
            MOBILE_LINK_STYLE
        };

        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a href=(endpoints::DASHBOARD_VIEW) class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        img src="/static/favicon-128x128.png" alt="Finance Tracker Logo" class="h-8";

                        span class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Finance Tracker"
                        }
                    }

                    div class="hidden w-full lg:block lg:w-auto"
                    {
                        ul
                            class="font-medium flex flex-col p-4 lg:p-0 mt-4
                            border border-gray-100 rounded bg-gray-50
                            lg:flex-row lg:space-x-8 rtl:space-x-reverse lg:mt-0
                            lg:border-0 lg:bg-white dark:bg-gray-800
                            lg:dark:bg-gray-900 dark:border-gray-700"
                        {
                            @for link in links.clone() {
                                li { (link.into_desktop_html()) }
                            }
                        }
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden"
            {
                div class="mx-auto max-w-screen-xl px-4 pb-4"
                {
                    div
                        class="rounded-xl border border-gray-200 bg-white/95
                        shadow-lg backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                    {
                        ul
                            class="grid grid-cols-4 gap-2 px-4 py-3 text-xs font-semibold
                            text-gray-600 dark:text-gray-300"
                            aria-label="Primary"
                        {
                            @for link in links.iter().filter(|link| !link.in_more_menu) {
                                li class="min-w-0" { (link.mobile_html()) }
                            }

                            li class="min-w-0" {
                                details class="group relative"
                                {
                                    summary
                                        class=(format!("list-none [&::-webkit-details-marker]:hidden cursor-pointer {more_summary_style}"))
                                        aria-current=[more_is_active.then_some("page")]
                                    {
                                        span class="truncate" { "More" }
                                    }

                                    div
                                        class="absolute bottom-full right-0 mb-3 w-40 rounded-xl
                                        border border-gray-200 bg-white/95 p-2 shadow-xl
                                        backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                                    {
                                        ul class="flex flex-col gap-1 text-sm font-medium"
                                        {
                                            @for link in links.iter().filter(|link| link.in_more_menu) {
                                                li { (link.more_menu_html()) }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use crate::{endpoints, navigation::NavBar};

    #[test]
    fn only_the_active_page_is_current() {
        for endpoint in [
            endpoints::DASHBOARD_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::BUDGETS_VIEW,
            endpoints::PROFILE_VIEW,
        ] {
            let nav_bar = NavBar::new(endpoint);

            let current = nav_bar
                .links
                .iter()
                .filter(|link| link.is_current)
                .map(|link| link.url)
                .collect::<Vec<_>>();
            assert_eq!(current, vec![endpoint]);
        }
    }

    #[test]
    fn non_nav_pages_have_no_current_link() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::LOG_IN_VIEW,
            endpoints::NEW_TRANSACTION_VIEW,
            endpoints::LOG_OUT,
        ] {
            let nav_bar = NavBar::new(endpoint);

            assert!(
                nav_bar.links.iter().all(|link| !link.is_current),
                "want no current link for {endpoint}"
            );
        }
    }

    #[test]
    fn renders_every_link() {
        let html = NavBar::new(endpoints::DASHBOARD_VIEW).into_html().into_string();
        let fragment = scraper::Html::parse_fragment(&html);
        let selector = scraper::Selector::parse("a[href]").unwrap();
        let hrefs = fragment
            .select(&selector)
            .filter_map(|link| link.value().attr("href"))
            .collect::<Vec<_>>();

        for endpoint in [
            endpoints::TRANSACTIONS_VIEW,
            endpoints::BUDGETS_VIEW,
            endpoints::REPORT,
            endpoints::PROFILE_VIEW,
            endpoints::LOG_OUT,
        ] {
            assert!(hrefs.contains(&endpoint), "want a link to {endpoint}");
        }
    }
}
