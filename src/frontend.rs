use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use serde_json::json;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, HtmlInputElement, HtmlTextAreaElement, MouseEvent, SubmitEvent};
use yew::prelude::*;

use crate::browser::{
    apply_theme, apply_theme_with_transition, random_unit, scroll_to_section, section_top,
    use_frame_coalesced, use_reveal, use_window_scroll, viewport_size, LocalStorageStore,
    RevealHandle, RevealHub,
};
use crate::config::{build_env_value, PageConfig};
use crate::contact::{submit, ContactAction, ContactField, ContactForm};
use crate::counter::{CounterAnimation, CounterTarget, COUNTER_TICK_MS};
use crate::flourish::{
    chart_parallax, scatter, shape_parallax, shape_tilt, LoadingPhase, Particle,
    ParticleProfile, PointerRatio, FLOAT_PARTICLES, TRAIL_PARTICLES,
};
use crate::log::{log_event, LogLevel};
use crate::mail::EmailJsTransport;
use crate::nav::{active_section, link_is_active, navbar_is_solid, MenuState, SectionOffset};
use crate::reveal::{RevealKind, MARKER_ANIMATION};
use crate::theme::{persist_theme, read_theme};
use crate::typing::{Typewriter, TypingPhase, TYPING_CHAR_MS};

const OWNER_NAME: &str = "Alex Morgan";
const OWNER_MONOGRAM: &str = "AM";
const OWNER_ROLE: &str = "Data analyst turning messy tables into decisions.";

const SECTIONS: [(&str, &str); 5] = [
    ("home", "Home"),
    ("about", "About"),
    ("skills", "Skills"),
    ("experience", "Experience"),
    ("contact", "Contact"),
];

const STATS: [(&str, &str); 4] = [
    ("150+", "Dashboards shipped"),
    ("3", "Years in analytics"),
    ("12", "Certifications"),
    ("98%", "On-time delivery"),
];

const SKILLS: [(&str, &str, &str); 4] = [
    ("fas fa-database", "SQL", "90%"),
    ("fab fa-python", "Python", "85%"),
    ("fas fa-chart-bar", "Power BI", "80%"),
    ("fas fa-table", "Excel", "95%"),
];

const TIMELINE: [(&str, &str, &str, &str); 3] = [
    (
        "2024 - now",
        "Data Analyst",
        "Northwind Retail",
        "Weekly sales reporting and demand forecasts for forty stores.",
    ),
    (
        "2022 - 2024",
        "BI Developer",
        "Contoso Health",
        "Rebuilt the clinical KPI warehouse and its Power BI layer.",
    ),
    (
        "2021",
        "Analytics Intern",
        "Fabrikam Labs",
        "Automated survey cleaning pipelines in Python.",
    ),
];

const FLOATING_SHAPES: usize = 4;
const CHART_POINTS: usize = 3;

#[hook]
fn use_page_config() -> Rc<PageConfig> {
    use_context::<Rc<PageConfig>>().unwrap_or_default()
}

#[derive(Properties, PartialEq)]
struct RevealBlockProps {
    #[prop_or_default]
    class: Classes,
    #[prop_or_default]
    children: Html,
}

#[function_component(RevealBlock)]
fn reveal_block(props: &RevealBlockProps) -> Html {
    let (node, reveal) = use_reveal(RevealKind::Generic, None);

    html! {
        <div
            ref={node}
            class={classes!(props.class.clone(), RevealKind::Generic.entrance_class(0), reveal.class())}
        >
            {props.children.clone()}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct StatCounterProps {
    value: AttrValue,
    label: AttrValue,
}

#[function_component(StatCounter)]
fn stat_counter(props: &StatCounterProps) -> Html {
    let config = use_page_config();
    let (node, reveal) = use_reveal(RevealKind::Counter, None);
    let text = use_state(|| props.value.to_string());
    let finished = use_state_eq(|| false);

    {
        let text = text.clone();
        let finished = finished.clone();
        let value = props.value.clone();
        use_effect_with(
            (reveal.counter_started, *finished),
            move |(started, done)| {
                let mut ticker = None;

                if *started && !*done {
                    match CounterTarget::parse(&value) {
                        Ok(target) => {
                            let mut animation = CounterAnimation::new(&target);
                            ticker = Some(Interval::new(COUNTER_TICK_MS, move || {
                                if let Some(frame) = animation.next() {
                                    text.set(frame.text);
                                }
                                if animation.is_finished() {
                                    finished.set(true);
                                }
                            }));
                        }
                        Err(error) => {
                            log_event(
                                &config,
                                LogLevel::Warn,
                                "counter_parse_failed",
                                json!({ "reason": error.to_string() }),
                            );
                            finished.set(true);
                        }
                    }
                }

                move || drop(ticker)
            },
        );
    }

    html! {
        <div class="stat">
            <span
                ref={node}
                class={classes!("stat-number", RevealKind::Counter.entrance_class(0), reveal.class())}
            >
                {(*text).clone()}
            </span>
            <span class="stat-label">{props.label.clone()}</span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SkillBarProps {
    level: AttrValue,
}

#[function_component(SkillBar)]
fn skill_bar(props: &SkillBarProps) -> Html {
    let (node, reveal) = use_reveal(RevealKind::ProgressBar, Some(props.level.clone()));

    html! {
        <div class="skill-bar">
            <div
                ref={node}
                class={classes!("skill-progress", RevealKind::ProgressBar.entrance_class(0), reveal.class())}
                data-width={props.level.clone()}
                style={format!("width: {};", reveal.width_or_zero())}
            />
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SkillCardProps {
    icon: AttrValue,
    name: AttrValue,
    level: AttrValue,
    position: usize,
}

#[function_component(SkillCard)]
fn skill_card(props: &SkillCardProps) -> Html {
    let (node, reveal) = use_reveal(RevealKind::SkillCard, None);
    let delay = RevealKind::SkillCard
        .entrance_delay(props.position)
        .map(|delay| format!("animation-delay: {delay};"));

    html! {
        <article
            ref={node}
            class={classes!("skill-card", RevealKind::SkillCard.entrance_class(props.position), reveal.class())}
            style={delay}
        >
            <i class={classes!("skill-icon", props.icon.to_string())} aria-hidden="true"></i>
            <h3>{props.name.clone()}</h3>
            <SkillBar level={props.level.clone()} />
            <span class="skill-level">{props.level.clone()}</span>
        </article>
    }
}

#[derive(Properties, PartialEq)]
struct TimelineItemProps {
    period: AttrValue,
    title: AttrValue,
    organisation: AttrValue,
    summary: AttrValue,
    position: usize,
}

#[function_component(TimelineItem)]
fn timeline_item(props: &TimelineItemProps) -> Html {
    let (node, reveal) = use_reveal(RevealKind::TimelineItem, None);
    let marker_style = reveal
        .marker_bounced
        .then(|| format!("animation: {MARKER_ANIMATION};"));

    html! {
        <li
            ref={node}
            class={classes!("timeline-item", RevealKind::TimelineItem.entrance_class(props.position), reveal.class())}
        >
            <div class="timeline-marker">
                <span class="marker-icon" style={marker_style}>
                    <i class="fas fa-briefcase" aria-hidden="true"></i>
                </span>
            </div>
            <div class="timeline-content">
                <span class="timeline-period">{props.period.clone()}</span>
                <h3>{props.title.clone()}</h3>
                <p class="timeline-org">{props.organisation.clone()}</p>
                <p>{props.summary.clone()}</p>
            </div>
        </li>
    }
}

#[derive(Properties, PartialEq)]
struct TypedTitleProps {
    text: AttrValue,
}

#[function_component(TypedTitle)]
fn typed_title(props: &TypedTitleProps) -> Html {
    let shown = use_state(String::new);
    let phase = use_state_eq(|| TypingPhase::Waiting);

    {
        let shown = shown.clone();
        let phase_handle = phase.clone();
        let text = props.text.clone();
        use_effect_with(*phase, move |phase| {
            let phase = *phase;
            let mut timeout = None;
            let mut interval = None;

            if let Some(hold_ms) = phase.hold_ms() {
                timeout = Some(Timeout::new(hold_ms, move || phase_handle.set(phase.next())));
            } else if phase == TypingPhase::Typing {
                let mut typewriter = Typewriter::new(text.to_string());
                interval = Some(Interval::new(TYPING_CHAR_MS, move || {
                    match typewriter.next() {
                        Some(prefix) => shown.set(prefix),
                        None => phase_handle.set(TypingPhase::Settling),
                    }
                }));
            }

            move || {
                drop(timeout);
                drop(interval);
            }
        });
    }

    html! {
        <span class="title-name" style={phase.style()} aria-label={props.text.clone()}>
            {(*shown).clone()}
        </span>
    }
}

#[derive(Clone, PartialEq)]
struct ParticleSet(Vec<Particle>);

impl Reducible for ParticleSet {
    type Action = u32;

    fn reduce(self: Rc<Self>, expired: Self::Action) -> Rc<Self> {
        let remaining: Vec<Particle> = self
            .0
            .iter()
            .filter(|particle| particle.id != expired)
            .cloned()
            .collect();
        Rc::new(Self(remaining))
    }
}

#[derive(Properties, PartialEq)]
struct ParticleLayerProps {
    profile: ParticleProfile,
}

#[function_component(ParticleLayer)]
fn particle_layer(props: &ParticleLayerProps) -> Html {
    let profile = props.profile;
    let particles = use_reducer(move || {
        ParticleSet(scatter(&profile, viewport_size(), 0, &mut random_unit))
    });

    {
        let dispatcher = particles.dispatcher();
        let initial = particles.0.clone();
        use_effect_with((), move |_| {
            let timers: Vec<Timeout> = initial
                .iter()
                .map(|particle| {
                    let dispatcher = dispatcher.clone();
                    let id = particle.id;
                    Timeout::new(particle.lifetime_ms(), move || dispatcher.dispatch(id))
                })
                .collect();

            move || drop(timers)
        });
    }

    html! {
        <div class={classes!("particle-layer", profile.class)} aria-hidden="true">
            {for particles.0.iter().map(|particle| html! {
                <div key={particle.id} class={profile.class} style={particle.style(&profile)} />
            })}
        </div>
    }
}

#[function_component(Hero)]
fn hero() -> Html {
    let scroll = use_state_eq(|| 0.0_f64);
    let pointer = use_state_eq(|| None::<PointerRatio>);

    use_window_scroll({
        let scroll = scroll.clone();
        Callback::from(move |scroll_y: f64| scroll.set(scroll_y))
    });

    let on_pointer_frame = use_frame_coalesced({
        let pointer = pointer.clone();
        Callback::from(move |ratio: PointerRatio| pointer.set(Some(ratio)))
    });

    let onmousemove = Callback::from(move |event: MouseEvent| {
        let client = (f64::from(event.client_x()), f64::from(event.client_y()));
        on_pointer_frame.emit(PointerRatio::from_client(client, viewport_size()));
    });

    let onmouseleave = {
        let pointer = pointer.clone();
        Callback::from(move |_: MouseEvent| pointer.set(None))
    };

    let shapes = (0..FLOATING_SHAPES).map(|index| {
        let style = match *pointer {
            Some(ratio) => shape_tilt(index, ratio),
            None => shape_parallax(index, *scroll),
        };
        html! { <div class={classes!("floating-shape", format!("shape-{}", index + 1))} style={style} /> }
    });

    let chart = (0..CHART_POINTS).map(|index| {
        html! { <span class="data-point" style={chart_parallax(index, *scroll)} /> }
    });

    html! {
        <section id="home" class="hero" onmousemove={onmousemove} onmouseleave={onmouseleave}>
            <ParticleLayer profile={FLOAT_PARTICLES} />
            <ParticleLayer profile={TRAIL_PARTICLES} />
            <div class="hero-shapes" aria-hidden="true">
                {for shapes}
                <div class="hero-chart">{for chart}</div>
            </div>
            <div class="hero-content">
                <h1 class="hero-title">
                    <span class="title-greeting">{"Hi, I'm "}</span>
                    <TypedTitle text={OWNER_NAME} />
                </h1>
                <p class="hero-subtitle">{OWNER_ROLE}</p>
                <a class="btn btn-primary" href="#contact">{"Get in touch"}</a>
            </div>
        </section>
    }
}

#[function_component(NavBar)]
fn nav_bar() -> Html {
    let config = use_page_config();
    let active = use_state_eq(|| None::<&'static str>);
    let solid = use_state_eq(|| false);
    let menu = use_state_eq(MenuState::default);

    use_window_scroll({
        let active = active.clone();
        let solid = solid.clone();
        let config = config.clone();
        Callback::from(move |scroll_y: f64| {
            let offsets: Vec<SectionOffset<'static>> = SECTIONS
                .iter()
                .filter_map(|&(id, _)| section_top(id).map(|top| SectionOffset { id, top }))
                .collect();
            active.set(active_section(
                &offsets,
                scroll_y,
                config.nav_activation_offset_px,
            ));
            solid.set(navbar_is_solid(scroll_y, config.nav_solid_after_px));
        })
    });

    let on_hamburger = {
        let menu = menu.clone();
        Callback::from(move |_: MouseEvent| menu.set(menu.toggled()))
    };

    let links = SECTIONS.iter().map(|&(id, label)| {
        let href = format!("#{id}");
        let is_active = link_is_active(&href, *active);
        let onclick = {
            let menu = menu.clone();
            let nav_height = config.nav_height_px;
            Callback::from(move |event: MouseEvent| {
                if scroll_to_section(id, nav_height) {
                    event.prevent_default();
                }
                menu.set(menu.closed());
            })
        };

        html! {
            <li>
                <a
                    class={classes!("nav-link", is_active.then_some("active"))}
                    href={href}
                    onclick={onclick}
                >
                    {label}
                </a>
            </li>
        }
    });

    html! {
        <nav class={classes!("navbar", solid.then_some("scrolled"))}>
            <div class="nav-container">
                <a class="nav-logo" href="#home">{OWNER_MONOGRAM}</a>
                <ul class={classes!("nav-menu", menu.class())}>
                    {for links}
                </ul>
                <button
                    class={classes!("hamburger", menu.class())}
                    type="button"
                    aria-label="Toggle navigation"
                    aria-expanded={menu.open.to_string()}
                    onclick={on_hamburger}
                >
                    <span class="bar"></span>
                    <span class="bar"></span>
                    <span class="bar"></span>
                </button>
            </div>
        </nav>
    }
}

#[function_component(LoadingScreen)]
fn loading_screen() -> Html {
    let phase = use_state_eq(|| LoadingPhase::Shown);

    {
        let handle = phase.clone();
        use_effect_with(*phase, move |phase| {
            let phase = *phase;
            let timer = phase
                .hold_ms()
                .map(|hold_ms| Timeout::new(hold_ms, move || handle.set(phase.next())));
            move || drop(timer)
        });
    }

    if *phase == LoadingPhase::Gone {
        return html! {};
    }

    html! {
        <div
            class="loading-screen"
            style={format!("opacity: {}; transition: opacity 0.5s ease;", phase.opacity())}
            aria-hidden="true"
        >
            <div class="loading-content">
                <div class="loading-logo">{OWNER_MONOGRAM}</div>
                <div class="loading-spinner"></div>
                <div class="loading-text">{"Loading..."}</div>
            </div>
        </div>
    }
}

impl Reducible for ContactForm {
    type Action = ContactAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

#[function_component(ContactFormView)]
fn contact_form_view() -> Html {
    let config = use_page_config();
    let form = use_reducer(ContactForm::default);
    let transport = use_memo(config.clone(), |config| {
        EmailJsTransport::new(config.mail.clone())
    });

    let onsubmit = {
        let form = form.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();

            let snapshot = (*form).clone();
            let dispatcher = form.dispatcher();
            let config = config.clone();
            let transport = transport.clone();
            spawn_local(async move {
                let outcome = submit(
                    &snapshot,
                    &*transport,
                    config.mail_recipient(),
                    |action: ContactAction| dispatcher.dispatch(action),
                )
                .await;

                match outcome {
                    Some(Ok(())) => {
                        log_event(&config, LogLevel::Info, "mail_delivered", json!({}))
                    }
                    Some(Err(error)) => log_event(
                        &config,
                        LogLevel::Error,
                        "mail_delivery_failed",
                        json!({ "class": error.class(), "reason": error.to_string() }),
                    ),
                    None => log_event(&config, LogLevel::Debug, "mail_submit_ignored", json!({})),
                }
            });
        })
    };

    let on_input = |field: ContactField| {
        let dispatcher = form.dispatcher();
        Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlInputElement>().value();
            dispatcher.dispatch(ContactAction::Edit(field, value));
        })
    };

    let on_message_input = {
        let dispatcher = form.dispatcher();
        Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlTextAreaElement>().value();
            dispatcher.dispatch(ContactAction::Edit(ContactField::Message, value));
        })
    };

    let button = form.button();
    let status = form.status_line();

    html! {
        <form id="contact-form" class="contact-form" onsubmit={onsubmit}>
            <div class="form-group">
                <label for="from_name">{"Name"}</label>
                <input
                    id="from_name"
                    name="from_name"
                    type="text"
                    required=true
                    value={form.fields.from_name.clone()}
                    oninput={on_input(ContactField::Name)}
                />
            </div>
            <div class="form-group">
                <label for="from_email">{"Email"}</label>
                <input
                    id="from_email"
                    name="from_email"
                    type="email"
                    required=true
                    value={form.fields.from_email.clone()}
                    oninput={on_input(ContactField::Email)}
                />
            </div>
            <div class="form-group">
                <label for="subject">{"Subject"}</label>
                <input
                    id="subject"
                    name="subject"
                    type="text"
                    required=true
                    value={form.fields.subject.clone()}
                    oninput={on_input(ContactField::Subject)}
                />
            </div>
            <div class="form-group">
                <label for="message">{"Message"}</label>
                <textarea
                    id="message"
                    name="message"
                    rows="5"
                    required=true
                    value={form.fields.message.clone()}
                    oninput={on_message_input}
                />
            </div>
            <button
                id="submit-btn"
                type="submit"
                class={classes!("btn", "btn-primary", button.loading.then_some("loading"))}
                disabled={button.loading}
            >
                <span id="btn-text">{button.label}</span>
                <i id="btn-icon" class={button.icon} aria-hidden="true"></i>
            </button>
            <p id="form-status" class={status.class} role="status">{status.text}</p>
        </form>
    }
}

#[function_component(App)]
fn app() -> Html {
    let config = use_memo((), |_| PageConfig::from_build_env());
    let hub = use_memo((), {
        let config = config.clone();
        move |_| RevealHandle(RevealHub::new(config))
    });
    let store = use_memo((), |_| LocalStorageStore::open());
    let theme = use_state({
        let store = store.clone();
        move || read_theme(&*store)
    });

    {
        let current = *theme;
        let config = config.clone();
        use_effect_with((), move |_| {
            apply_theme(current);
            log_event(
                &config,
                LogLevel::Info,
                "page_initialized",
                json!({
                    "theme": current.as_str(),
                    "mail_configured": config.mail.is_some(),
                    "build_keys": PageConfig::configured_keys(build_env_value),
                }),
            );
            || ()
        });
    }

    let on_toggle = {
        let theme = theme.clone();
        let config = config.clone();
        Callback::from(move |_: MouseEvent| {
            let next = (*theme).toggled();
            if let Err(error) = persist_theme(&*store, next) {
                log_event(
                    &config,
                    LogLevel::Warn,
                    "theme_persist_failed",
                    json!({ "theme": next.as_str(), "reason": error.to_string() }),
                );
            }
            apply_theme_with_transition(next);
            theme.set(next);
        })
    };

    html! {
        <ContextProvider<Rc<PageConfig>> context={config.clone()}>
            <ContextProvider<RevealHandle> context={(*hub).clone()}>
                <LoadingScreen />
                <NavBar />
                <main id="content">
                    <Hero />

                    <section id="about" class="about">
                        <h2 class="section-title">{"About"}</h2>
                        <RevealBlock class="about-card">
                            <p>
                                {"I build reporting that people actually open: clean models, honest charts, and \
                                  dashboards that answer the question they were asked."}
                            </p>
                        </RevealBlock>
                        <div class="stats">
                            {for STATS.iter().map(|&(value, label)| html! {
                                <StatCounter value={value} label={label} />
                            })}
                        </div>
                    </section>

                    <section id="skills" class="skills">
                        <h2 class="section-title">{"Skills"}</h2>
                        <div class="skills-grid">
                            {for SKILLS.iter().enumerate().map(|(position, &(icon, name, level))| html! {
                                <SkillCard icon={icon} name={name} level={level} position={position} />
                            })}
                        </div>
                    </section>

                    <section id="experience" class="experiences">
                        <h2 class="section-title">{"Experience"}</h2>
                        <ol class="timeline">
                            {for TIMELINE.iter().enumerate().map(|(position, &(period, title, organisation, summary))| html! {
                                <TimelineItem
                                    period={period}
                                    title={title}
                                    organisation={organisation}
                                    summary={summary}
                                    position={position}
                                />
                            })}
                        </ol>
                    </section>

                    <section id="contact" class="contact">
                        <h2 class="section-title">{"Contact"}</h2>
                        <div class="contact-grid">
                            <RevealBlock class="contact-card">
                                <h3>{"Let's talk data"}</h3>
                                <p>{"Open to analytics roles and freelance dashboard work."}</p>
                            </RevealBlock>
                            <ContactFormView />
                        </div>
                    </section>
                </main>
                <button
                    class="theme-toggle"
                    type="button"
                    aria-label={(*theme).toggle_label()}
                    aria-pressed={(*theme).pressed().to_string()}
                    onclick={on_toggle}
                >
                    <i class={(*theme).icon()} aria-hidden="true"></i>
                </button>
            </ContextProvider<RevealHandle>>
        </ContextProvider<Rc<PageConfig>>>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
